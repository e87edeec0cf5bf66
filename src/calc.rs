use crate::grading;
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Half-up rounding on the scaled value: `Int(100*x + 0.5) / 100`.
pub fn round_off_2_decimal(x: f64) -> f64 {
    ((100.0 * x) + 0.5).floor() / 100.0
}

/// Same rule at one decimal, used for exam percentages.
pub fn round_off_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

/// `Some` for finite values with no fractional part. Out-of-range values
/// saturate.
pub fn whole_number(x: f64) -> Option<i64> {
    (x.is_finite() && x.fract() == 0.0).then(|| x as i64)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CreditHourRepr {
    Int(i64),
    Float(f64),
}

impl CreditHourRepr {
    fn into_whole<E: de::Error>(self) -> Result<i64, E> {
        match self {
            CreditHourRepr::Int(n) => Ok(n),
            CreditHourRepr::Float(x) => whole_number(x)
                .ok_or_else(|| E::custom(format!("credit hours must be a whole number, got {}", x))),
        }
    }
}

/// Accepts `3` as well as `3.0`, which JavaScript callers send freely.
pub fn deserialize_credit_hour<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    CreditHourRepr::deserialize(d)?.into_whole()
}

pub fn deserialize_opt_credit_hour<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<i64>, D::Error> {
    Option::<CreditHourRepr>::deserialize(d)?
        .map(CreditHourRepr::into_whole)
        .transpose()
}

/// Anything that contributes a credit-weighted grade point to an average.
pub trait CreditPoints {
    fn credit_hour(&self) -> i64;
    fn point_value(&self) -> f64;
}

impl<T: CreditPoints + ?Sized> CreditPoints for &T {
    fn credit_hour(&self) -> i64 {
        (**self).credit_hour()
    }
    fn point_value(&self) -> f64 {
        (**self).point_value()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "deserialize_credit_hour")]
    pub credit_hour: i64,
    #[serde(default)]
    pub grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks_percentage: Option<f64>,
    #[serde(default)]
    pub point_value: f64,
}

impl Subject {
    /// Builds a subject whose point value is taken from `grade`.
    pub fn with_grade(code: &str, name: &str, credit_hour: i64, grade: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            code: code.to_string(),
            name: name.to_string(),
            credit_hour,
            grade: grade.to_string(),
            marks_percentage: None,
            point_value: grading::point_from_grade(grade),
        }
    }

    /// Builds a subject graded from a percentage mark.
    pub fn with_marks(code: &str, name: &str, credit_hour: i64, marks: f64) -> Self {
        let r = grading::grade_from_marks(marks);
        Self {
            id: Uuid::new_v4().to_string(),
            code: code.to_string(),
            name: name.to_string(),
            credit_hour,
            grade: r.grade,
            marks_percentage: Some(marks),
            point_value: r.point_value,
        }
    }

    /// Sets the grade label and its point value together.
    pub fn set_grade(&mut self, grade: &str) {
        self.grade = grade.to_string();
        self.marks_percentage = None;
        self.point_value = grading::point_from_grade(grade);
    }

    pub fn set_marks(&mut self, marks: f64) {
        let r = grading::grade_from_marks(marks);
        self.grade = r.grade;
        self.marks_percentage = Some(marks);
        self.point_value = r.point_value;
    }
}

impl CreditPoints for Subject {
    fn credit_hour(&self) -> i64 {
        self.credit_hour
    }
    fn point_value(&self) -> f64 {
        self.point_value
    }
}

/// Stored shape of a semester. Any `gpa` found in storage is discarded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SemesterRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    subjects: Vec<Subject>,
}

/// An ordered group of subjects. `gpa` is cached and recomputed by every
/// method that touches `subjects`; there is no way to set it directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SemesterRecord")]
pub struct Semester {
    pub id: String,
    pub name: String,
    subjects: Vec<Subject>,
    gpa: f64,
}

impl From<SemesterRecord> for Semester {
    fn from(r: SemesterRecord) -> Self {
        Semester::with_subjects(r.id, r.name, r.subjects)
    }
}

impl Semester {
    pub fn new(name: impl Into<String>) -> Self {
        Semester::with_subjects(Uuid::new_v4().to_string(), name.into(), Vec::new())
    }

    pub fn with_subjects(id: String, name: String, subjects: Vec<Subject>) -> Self {
        let gpa = calculate_gpa(&subjects);
        Self {
            id,
            name,
            subjects,
            gpa,
        }
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn gpa(&self) -> f64 {
        self.gpa
    }

    /// Runs `f` against the subject list and refreshes the cached GPA.
    pub fn edit_subjects<R>(&mut self, f: impl FnOnce(&mut Vec<Subject>) -> R) -> R {
        let out = f(&mut self.subjects);
        self.gpa = calculate_gpa(&self.subjects);
        out
    }
}

/// `Σ(credit × point) / Σ(credit)` rounded to 2 decimals. Empty input and a
/// zero credit total both give 0.
pub fn calculate_gpa<I>(subjects: I) -> f64
where
    I: IntoIterator,
    I::Item: CreditPoints,
{
    let mut quality_points = 0.0_f64;
    let mut credits = 0.0_f64;
    for s in subjects {
        let credit = s.credit_hour() as f64;
        quality_points += credit * s.point_value();
        credits += credit;
    }
    if credits == 0.0 {
        return 0.0;
    }
    round_off_2_decimal(quality_points / credits)
}

/// Computed over the flattened subject list, never as a mean of semester GPAs.
pub fn calculate_cgpa(semesters: &[Semester]) -> f64 {
    calculate_gpa(semesters.iter().flat_map(|s| s.subjects.iter()))
}

pub fn total_credits(semesters: &[Semester]) -> i64 {
    semesters
        .iter()
        .flat_map(|s| s.subjects.iter())
        .fold(0_i64, |acc, s| acc.saturating_add(s.credit_hour))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub name: String,
    pub gpa: f64,
    pub cgpa: f64,
}

/// Semester GPA next to the running CGPA after each semester.
pub fn cgpa_trend(semesters: &[Semester]) -> Vec<TrendPoint> {
    let mut seen: Vec<&Subject> = Vec::new();
    semesters
        .iter()
        .enumerate()
        .map(|(idx, sem)| {
            seen.extend(sem.subjects.iter());
            let name = if sem.name.trim().is_empty() {
                format!("Sem {}", idx + 1)
            } else {
                sem.name.clone()
            };
            TrendPoint {
                name,
                gpa: calculate_gpa(&sem.subjects),
                cgpa: calculate_gpa(seen.iter().copied()),
            }
        })
        .collect()
}
