use crate::calc::{self, Semester, Subject, TrendPoint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a subject's grade is entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode", content = "value")]
pub enum GradeInput {
    Grade(String),
    Marks(f64),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubject {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "calc::deserialize_credit_hour")]
    pub credit_hour: i64,
    pub grade: GradeInput,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectEdit {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "calc::deserialize_opt_credit_hour")]
    pub credit_hour: Option<i64>,
    pub grade: Option<GradeInput>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    SemesterNotFound(String),
    SubjectNotFound(String),
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::SemesterNotFound(id) => write!(f, "semester not found: {}", id),
            BookError::SubjectNotFound(id) => write!(f, "subject not found: {}", id),
        }
    }
}

impl std::error::Error for BookError {}

fn or_default(value: &str, fallback: &str) -> String {
    let t = value.trim();
    if t.is_empty() {
        fallback.to_string()
    } else {
        t.to_string()
    }
}

fn apply_grade(subject: &mut Subject, grade: &GradeInput) {
    match grade {
        GradeInput::Grade(label) => subject.set_grade(label),
        GradeInput::Marks(marks) => subject.set_marks(*marks),
    }
}

/// The user's semesters in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SemesterBook {
    semesters: Vec<Semester>,
}

impl SemesterBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    pub fn semester(&self, id: &str) -> Option<&Semester> {
        self.semesters.iter().find(|s| s.id == id)
    }

    fn semester_mut(&mut self, id: &str) -> Result<&mut Semester, BookError> {
        self.semesters
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| BookError::SemesterNotFound(id.to_string()))
    }

    pub fn add_semester(&mut self, name: Option<&str>) -> &Semester {
        let fallback = format!("Semester {}", self.semesters.len() + 1);
        let name = or_default(name.unwrap_or(""), &fallback);
        self.semesters.push(Semester::new(name));
        &self.semesters[self.semesters.len() - 1]
    }

    /// Appends an already-built subject list as a new semester.
    pub fn push_semester(&mut self, name: Option<&str>, subjects: Vec<Subject>) -> &Semester {
        let fallback = format!("Extracted Semester {}", self.semesters.len() + 1);
        let name = or_default(name.unwrap_or(""), &fallback);
        let sem = Semester::with_subjects(uuid::Uuid::new_v4().to_string(), name, subjects);
        self.semesters.push(sem);
        &self.semesters[self.semesters.len() - 1]
    }

    pub fn rename_semester(&mut self, id: &str, name: &str) -> Result<(), BookError> {
        self.semester_mut(id)?.name = name.trim().to_string();
        Ok(())
    }

    pub fn remove_semester(&mut self, id: &str) -> Result<Semester, BookError> {
        let idx = self
            .semesters
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| BookError::SemesterNotFound(id.to_string()))?;
        Ok(self.semesters.remove(idx))
    }

    pub fn add_subject(&mut self, semester_id: &str, input: NewSubject) -> Result<Subject, BookError> {
        let sem = self.semester_mut(semester_id)?;
        let code = or_default(&input.code, "SUB");
        let name = or_default(&input.name, "Subject");
        let subject = match input.grade {
            GradeInput::Grade(label) => Subject::with_grade(&code, &name, input.credit_hour, &label),
            GradeInput::Marks(marks) => Subject::with_marks(&code, &name, input.credit_hour, marks),
        };
        sem.edit_subjects(|subs| subs.push(subject.clone()));
        Ok(subject)
    }

    pub fn update_subject(
        &mut self,
        semester_id: &str,
        subject_id: &str,
        edit: SubjectEdit,
    ) -> Result<Subject, BookError> {
        let sem = self.semester_mut(semester_id)?;
        sem.edit_subjects(|subs| {
            let subject = subs
                .iter_mut()
                .find(|s| s.id == subject_id)
                .ok_or_else(|| BookError::SubjectNotFound(subject_id.to_string()))?;
            if let Some(code) = edit.code.as_deref() {
                subject.code = or_default(code, "SUB");
            }
            if let Some(name) = edit.name.as_deref() {
                subject.name = or_default(name, "Unknown");
            }
            if let Some(credit_hour) = edit.credit_hour {
                subject.credit_hour = credit_hour;
            }
            if let Some(grade) = edit.grade.as_ref() {
                apply_grade(subject, grade);
            }
            Ok(subject.clone())
        })
    }

    pub fn remove_subject(&mut self, semester_id: &str, subject_id: &str) -> Result<Subject, BookError> {
        let sem = self.semester_mut(semester_id)?;
        sem.edit_subjects(|subs| {
            let idx = subs
                .iter()
                .position(|s| s.id == subject_id)
                .ok_or_else(|| BookError::SubjectNotFound(subject_id.to_string()))?;
            Ok(subs.remove(idx))
        })
    }

    pub fn cgpa(&self) -> f64 {
        calc::calculate_cgpa(&self.semesters)
    }

    pub fn total_credits(&self) -> i64 {
        calc::total_credits(&self.semesters)
    }

    pub fn trend(&self) -> Vec<TrendPoint> {
        calc::cgpa_trend(&self.semesters)
    }
}
