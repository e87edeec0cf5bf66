//! What-if solvers. Each one inverts the averaging formula for a single
//! unknown and reports infeasible targets through `achievable`, never as an
//! error.

use crate::calc::{round_off_1_decimal, round_off_2_decimal};
use crate::grading::{self, GRADING_SCALE};
use serde::{Deserialize, Serialize};

pub const MAX_GPA: f64 = 4.0;
pub const MAX_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub result: f64,
    pub achievable: bool,
    pub message: String,
}

impl Prediction {
    fn achievable(result: f64, message: String) -> Self {
        Self {
            result,
            achievable: true,
            message,
        }
    }

    fn unachievable(result: f64, message: impl Into<String>) -> Self {
        Self {
            result,
            achievable: false,
            message: message.into(),
        }
    }
}

/// GPA needed over `next_credits` to move `current_cgpa` (earned over
/// `completed_credits`) up to `target_cgpa`.
pub fn calculate_required_gpa(
    current_cgpa: f64,
    completed_credits: i64,
    target_cgpa: f64,
    next_credits: i64,
) -> Prediction {
    if next_credits == 0 {
        return Prediction::unachievable(0.0, "No credits for next semester.");
    }

    let total = completed_credits as f64 + next_credits as f64;
    let required = (target_cgpa * total - current_cgpa * completed_credits as f64)
        / next_credits as f64;
    let rounded = round_off_2_decimal(required);

    if rounded > MAX_GPA {
        return Prediction::unachievable(
            rounded,
            format!(
                "You would need a GPA of {:.2}, which is above {:.2}. This target is not achievable in one semester.",
                rounded, MAX_GPA
            ),
        );
    }
    if rounded < 0.0 {
        return Prediction::achievable(
            0.0,
            format!(
                "You've already exceeded this target! Any GPA will keep your CGPA above {:.2}.",
                target_cgpa
            ),
        );
    }
    Prediction::achievable(
        rounded,
        format!(
            "You need at least {:.2} GPA next semester to achieve a {:.2} CGPA.",
            rounded, target_cgpa
        ),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSubject {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "crate::calc::deserialize_credit_hour")]
    pub credit_hour: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinGrade {
    pub code: String,
    pub name: String,
    pub credit_hour: i64,
    pub min_grade: String,
    pub min_point: f64,
}

/// Lowest grade per subject that reaches `target_gpa` when every subject
/// scores the same point value. Credit weights do not shift the requirement
/// between subjects. A target above the scale saturates at the top grade;
/// callers judge feasibility against `MAX_GPA` themselves.
pub fn calculate_min_grades(target_gpa: f64, subjects: &[PlannedSubject]) -> Vec<MinGrade> {
    let top = &GRADING_SCALE[0];
    let needed = GRADING_SCALE
        .iter()
        .rev()
        .find(|g| g.point_value >= target_gpa)
        .unwrap_or(top);

    subjects
        .iter()
        .map(|s| MinGrade {
            code: s.code.clone(),
            name: s.name.clone(),
            credit_hour: s.credit_hour,
            min_grade: needed.grade.to_string(),
            min_point: needed.point_value,
        })
        .collect()
}

/// Final exam percentage needed to reach the bottom of `target_grade`'s band,
/// given coursework `carry_mark` worth `carry_weight` percent of the course.
pub fn calculate_final_exam_score(carry_mark: f64, carry_weight: f64, target_grade: &str) -> Prediction {
    let Some(entry) = grading::entry_for_grade(target_grade) else {
        return Prediction::unachievable(0.0, "Invalid grade.");
    };

    let final_weight = 100.0 - carry_weight;
    if final_weight == 0.0 {
        return Prediction::unachievable(0.0, "Final exam has 0% weight.");
    }

    let carry_contribution = carry_mark * (carry_weight / 100.0);
    let required = (entry.min_mark as f64 - carry_contribution) / (final_weight / 100.0);
    let rounded = round_off_1_decimal(required);

    if rounded > MAX_PERCENT {
        return Prediction::unachievable(
            rounded,
            format!(
                "You need {:.1}% on the final, which is above the maximum of {:.0}%. This grade is not achievable.",
                rounded, MAX_PERCENT
            ),
        );
    }
    if rounded < 0.0 {
        return Prediction::achievable(
            0.0,
            format!(
                "You've already secured {} with your carry marks! Any final score will work.",
                target_grade
            ),
        );
    }
    Prediction::achievable(
        rounded,
        format!(
            "You need at least {:.1}% on the final exam to get {}.",
            rounded, target_grade
        ),
    )
}
