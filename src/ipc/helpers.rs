use super::error::ApiError;
use super::types::{AppState, Request};
use crate::book::SemesterBook;
use crate::calc;
use crate::db;
use rusqlite::Connection;
use serde::de::DeserializeOwned;

pub fn require_db<'a>(state: &'a AppState) -> Result<&'a Connection, ApiError> {
    state.db.as_ref().ok_or_else(ApiError::no_workspace)
}

pub fn get_str<'a>(req: &'a Request, key: &str) -> Result<&'a str, ApiError> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::bad_params(format!("missing {}", key)))
}

pub fn opt_str<'a>(req: &'a Request, key: &str) -> Option<&'a str> {
    req.params.get(key).and_then(|v| v.as_str())
}

pub fn get_f64(req: &Request, key: &str) -> Result<f64, ApiError> {
    req.params
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| ApiError::bad_params(format!("{} must be a number", key)))
}

pub fn get_i64(req: &Request, key: &str) -> Result<i64, ApiError> {
    req.params
        .get(key)
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().and_then(calc::whole_number)))
        .ok_or_else(|| ApiError::bad_params(format!("{} must be an integer", key)))
}

/// Deserializes `params[key]` into `T`.
pub fn get_typed<T: DeserializeOwned>(req: &Request, key: &str) -> Result<T, ApiError> {
    let Some(raw) = req.params.get(key) else {
        return Err(ApiError::bad_params(format!("missing {}", key)));
    };
    serde_json::from_value(raw.clone())
        .map_err(|e| ApiError::bad_params(format!("invalid {}: {}", key, e)))
}

pub fn load_book(conn: &Connection) -> Result<SemesterBook, ApiError> {
    db::kv_load(conn, db::SEMESTERS_KEY).map_err(|e| {
        log::error!("failed to load semesters: {:#}", e);
        ApiError::new("db_query_failed", format!("{:#}", e))
    })
}

pub fn save_book(conn: &Connection, book: &SemesterBook) -> Result<(), ApiError> {
    db::kv_store(conn, db::SEMESTERS_KEY, book).map_err(|e| {
        log::error!("failed to store semesters: {:#}", e);
        ApiError::new("db_write_failed", format!("{:#}", e))
    })
}

pub fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::new("internal", e.to_string()))
}
