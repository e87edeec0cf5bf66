use crate::db;
use crate::ipc::error::{respond, ApiError};
use crate::ipc::helpers::{get_str, opt_str, require_db, to_json};
use crate::ipc::types::{AppState, Request};
use crate::study::{StudyHistory, StudySession, DEFAULT_DAILY_GOAL_SECONDS};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use serde_json::json;

pub const DAILY_GOAL_SETTING: &str = "study.dailyGoalSeconds";

fn parse_time(req: &Request, key: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = get_str(req, key)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ApiError::bad_params(format!("{} must be an RFC 3339 timestamp: {}", key, e)))
}

fn load_history(conn: &Connection) -> Result<StudyHistory, ApiError> {
    db::kv_load(conn, db::STUDY_HISTORY_KEY)
        .map_err(|e| ApiError::new("db_query_failed", format!("{:#}", e)))
}

fn daily_goal(conn: &Connection) -> Result<i64, ApiError> {
    let stored = db::settings_get_json(conn, DAILY_GOAL_SETTING)
        .map_err(|e| ApiError::new("db_query_failed", format!("{:#}", e)))?;
    Ok(stored
        .and_then(|v| v.as_i64())
        .unwrap_or(DEFAULT_DAILY_GOAL_SECONDS))
}

fn handle_record(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let subject = opt_str(req, "subject").unwrap_or("General");
    let start_time = parse_time(req, "startTime")?;
    let end_time = parse_time(req, "endTime")?;
    if end_time < start_time {
        return Err(ApiError::bad_params("endTime is before startTime"));
    }
    let duration = req.params.get("duration").and_then(|v| v.as_i64());

    let session = StudySession::new(subject, start_time, end_time, duration);
    let mut history = load_history(conn)?;
    if !history.record(session.clone()) {
        log::debug!("study session of {}s discarded", session.duration);
        return Ok(json!({ "recorded": false }));
    }
    db::kv_store(conn, db::STUDY_HISTORY_KEY, &history)
        .map_err(|e| ApiError::new("db_write_failed", format!("{:#}", e)))?;
    Ok(json!({ "recorded": true, "session": to_json(&session)? }))
}

fn handle_history(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let history = load_history(conn)?;
    Ok(json!({ "days": to_json(&history.days())? }))
}

fn handle_summary(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let today = match opt_str(req, "today") {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|e| ApiError::bad_params(format!("today must be YYYY-MM-DD: {}", e)))?,
        None => Utc::now().date_naive(),
    };
    let goal = daily_goal(conn)?;
    let summary = load_history(conn)?.summarize(today, goal);
    let mut out = to_json(&summary)?;
    out["dailyGoalSeconds"] = json!(goal);
    out["today"] = json!(today.format("%Y-%m-%d").to_string());
    Ok(out)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "study.record" => handle_record(state, req),
        "study.history" => handle_history(state, req),
        "study.summary" => handle_summary(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
