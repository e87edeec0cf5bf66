use crate::ipc::error::{respond, ApiError};
use crate::ipc::helpers::{get_f64, get_i64, get_str, get_typed, load_book, to_json};
use crate::ipc::types::{AppState, Request};
use crate::predictor::{self, PlannedSubject};
use serde_json::json;

/// Current standing defaults to the workspace's semesters when the caller
/// does not pass it.
fn handle_required_gpa(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let target_cgpa = get_f64(req, "targetCgpa")?;
    let next_credits = get_i64(req, "nextCredits")?;

    let stored = match state.db.as_ref() {
        Some(conn) if req.params.get("currentCgpa").is_none()
            || req.params.get("completedCredits").is_none() =>
        {
            Some(load_book(conn)?)
        }
        _ => None,
    };
    let current_cgpa = match req.params.get("currentCgpa") {
        Some(_) => get_f64(req, "currentCgpa")?,
        None => stored.as_ref().map(|b| b.cgpa()).unwrap_or(0.0),
    };
    let completed_credits = match req.params.get("completedCredits") {
        Some(_) => get_i64(req, "completedCredits")?,
        None => stored.as_ref().map(|b| b.total_credits()).unwrap_or(0),
    };

    let p = predictor::calculate_required_gpa(current_cgpa, completed_credits, target_cgpa, next_credits);
    Ok(json!({
        "requiredGPA": p.result,
        "achievable": p.achievable,
        "message": p.message,
        "currentCgpa": current_cgpa,
        "completedCredits": completed_credits,
    }))
}

fn handle_min_grades(_state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let target_gpa = get_f64(req, "targetGpa")?;
    let subjects: Vec<PlannedSubject> = get_typed(req, "subjects")?;
    let rows = predictor::calculate_min_grades(target_gpa, &subjects);
    Ok(json!({
        "rows": to_json(&rows)?,
        "withinScale": target_gpa <= predictor::MAX_GPA,
    }))
}

fn handle_final_exam(_state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let carry_mark = get_f64(req, "carryMark")?;
    let carry_weight = get_f64(req, "carryWeight")?;
    let target_grade = get_str(req, "targetGrade")?;
    let p = predictor::calculate_final_exam_score(carry_mark, carry_weight, target_grade);
    Ok(json!({
        "requiredScore": p.result,
        "achievable": p.achievable,
        "message": p.message,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "predict.requiredGpa" => handle_required_gpa(state, req),
        "predict.minGrades" => handle_min_grades(state, req),
        "predict.finalExam" => handle_final_exam(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
