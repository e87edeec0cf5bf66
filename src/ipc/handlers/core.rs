use crate::ipc::error::{respond, ApiError};
use crate::ipc::helpers::get_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, ApiError> {
    Ok(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
    }))
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let path = PathBuf::from(get_str(req, "path")?);
    if let Err(e) = state.open_workspace(&path) {
        log::error!("workspace open failed: {:#}", e);
        return Err(ApiError::new("db_open_failed", format!("{:#}", e)));
    }
    Ok(json!({ "workspacePath": path.to_string_lossy() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "health" => handle_health(state, req),
        "workspace.select" => handle_workspace_select(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
