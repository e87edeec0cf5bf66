use crate::db;
use crate::ipc::error::{respond, ApiError};
use crate::ipc::helpers::{get_str, require_db};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_get(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let key = get_str(req, "key")?;
    let value = db::settings_get_json(conn, key)
        .map_err(|e| ApiError::new("db_query_failed", format!("{:#}", e)))?;
    Ok(json!({ "key": key, "value": value }))
}

fn handle_set(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let key = get_str(req, "key")?.trim();
    if key.is_empty() {
        return Err(ApiError::bad_params("key must not be empty"));
    }
    let Some(value) = req.params.get("value") else {
        return Err(ApiError::bad_params("missing value"));
    };
    db::settings_set_json(conn, key, value)
        .map_err(|e| ApiError::new("db_write_failed", format!("{:#}", e)))?;
    Ok(json!({ "key": key }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "settings.get" => handle_get(state, req),
        "settings.set" => handle_set(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
