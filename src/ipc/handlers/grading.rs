use crate::calc::{self, CreditPoints, Semester};
use crate::grading;
use crate::ipc::error::{respond, ApiError};
use crate::ipc::helpers::{get_f64, get_str, get_typed, to_json};
use crate::ipc::types::{AppState, Request};
use serde::Deserialize;
use serde_json::json;

/// Caller-supplied subject for stateless GPA requests; only the weight and
/// the point value matter.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeightedGrade {
    #[serde(deserialize_with = "calc::deserialize_credit_hour")]
    credit_hour: i64,
    #[serde(default)]
    point_value: f64,
}

impl CreditPoints for WeightedGrade {
    fn credit_hour(&self) -> i64 {
        self.credit_hour
    }
    fn point_value(&self) -> f64 {
        self.point_value
    }
}

fn handle_scale(_state: &mut AppState, _req: &Request) -> Result<serde_json::Value, ApiError> {
    Ok(json!({
        "scale": to_json(&grading::GRADING_SCALE)?,
        "grades": grading::available_grades(),
    }))
}

fn handle_from_marks(_state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let marks = get_f64(req, "marks")?;
    to_json(&grading::grade_from_marks(marks))
}

fn handle_point_from_grade(_state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let grade = get_str(req, "grade")?;
    Ok(json!({
        "grade": grade,
        "pointValue": grading::point_from_grade(grade),
    }))
}

fn handle_gpa(_state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let subjects: Vec<WeightedGrade> = get_typed(req, "subjects")?;
    Ok(json!({ "gpa": calc::calculate_gpa(&subjects) }))
}

fn handle_cgpa(_state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let semesters: Vec<Semester> = get_typed(req, "semesters")?;
    Ok(json!({
        "cgpa": calc::calculate_cgpa(&semesters),
        "totalCredits": calc::total_credits(&semesters),
        "trend": to_json(&calc::cgpa_trend(&semesters))?,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "grading.scale" => handle_scale(state, req),
        "grading.fromMarks" => handle_from_marks(state, req),
        "grading.pointFromGrade" => handle_point_from_grade(state, req),
        "gpa.calculate" => handle_gpa(state, req),
        "gpa.cgpa" => handle_cgpa(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
