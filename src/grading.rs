use serde::Serialize;

/// One row of the grading scale: an inclusive integer mark range and the
/// letter grade / grade point it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingEntry {
    pub min_mark: i64,
    pub max_mark: i64,
    pub grade: &'static str,
    pub point_value: f64,
}

const fn entry(min_mark: i64, max_mark: i64, grade: &'static str, point_value: f64) -> GradingEntry {
    GradingEntry {
        min_mark,
        max_mark,
        grade,
        point_value,
    }
}

/// Highest band first. Table order is display order.
pub static GRADING_SCALE: [GradingEntry; 13] = [
    entry(90, 100, "A+", 4.00),
    entry(85, 89, "A", 4.00),
    entry(80, 84, "A-", 3.67),
    entry(75, 79, "B+", 3.33),
    entry(70, 74, "B", 3.00),
    entry(65, 69, "B-", 2.67),
    entry(60, 64, "C+", 2.33),
    entry(55, 59, "C", 2.00),
    entry(50, 54, "C-", 1.67),
    entry(45, 49, "D+", 1.33),
    entry(40, 44, "D", 1.00),
    entry(35, 39, "D-", 0.67),
    entry(0, 34, "F", 0.00),
];

pub const FAIL_GRADE: &str = "F";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResult {
    pub grade: String,
    pub point_value: f64,
}

/// Rounds `marks` half-up to an integer and returns the band containing it.
/// Anything outside the table (negative, above 100, NaN) resolves to `F`.
pub fn grade_from_marks(marks: f64) -> GradeResult {
    let found = if marks.is_finite() {
        let rounded = (marks + 0.5).floor() as i64;
        GRADING_SCALE
            .iter()
            .find(|g| rounded >= g.min_mark && rounded <= g.max_mark)
    } else {
        None
    };
    match found {
        Some(g) => GradeResult {
            grade: g.grade.to_string(),
            point_value: g.point_value,
        },
        None => GradeResult {
            grade: FAIL_GRADE.to_string(),
            point_value: 0.0,
        },
    }
}

/// Exact, case-sensitive label lookup.
pub fn entry_for_grade(grade: &str) -> Option<&'static GradingEntry> {
    GRADING_SCALE.iter().find(|g| g.grade == grade)
}

/// Unknown or empty labels are worth zero points.
pub fn point_from_grade(grade: &str) -> f64 {
    entry_for_grade(grade).map(|g| g.point_value).unwrap_or(0.0)
}

pub fn available_grades() -> Vec<&'static str> {
    GRADING_SCALE.iter().map(|g| g.grade).collect()
}
