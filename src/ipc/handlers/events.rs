use crate::db;
use crate::events::{self, EventCategory, UserEvents};
use crate::ipc::error::{respond, ApiError};
use crate::ipc::helpers::{get_str, get_typed, opt_str, require_db, to_json};
use crate::ipc::types::{AppState, Request};
use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;
use serde_json::json;

fn load_events(conn: &Connection) -> Result<UserEvents, ApiError> {
    db::kv_load(conn, db::EVENTS_KEY)
        .map_err(|e| ApiError::new("db_query_failed", format!("{:#}", e)))
}

fn save_events(conn: &Connection, list: &UserEvents) -> Result<(), ApiError> {
    db::kv_store(conn, db::EVENTS_KEY, list)
        .map_err(|e| ApiError::new("db_write_failed", format!("{:#}", e)))
}

/// Optional `now` param; defaults to the local wall clock, which is what
/// event dates are entered in.
fn now_param(req: &Request) -> Result<NaiveDateTime, ApiError> {
    match opt_str(req, "now") {
        Some(raw) => events::parse_event_time(raw).ok_or_else(|| {
            ApiError::bad_params("now must be YYYY-MM-DD or YYYY-MM-DDTHH:MM")
        }),
        None => Ok(Local::now().naive_local()),
    }
}

fn agenda_json(list: &UserEvents, now: NaiveDateTime) -> Result<serde_json::Value, ApiError> {
    let mut out = to_json(&list.agenda(now))?;
    out["now"] = json!(now.format("%Y-%m-%dT%H:%M").to_string());
    Ok(out)
}

fn handle_list(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let now = now_param(req)?;
    agenda_json(&load_events(conn)?, now)
}

fn handle_create(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let now = now_param(req)?;
    let title = get_str(req, "title")?;
    let date = get_str(req, "date")?;
    let category: EventCategory = match req.params.get("category") {
        Some(_) => get_typed(req, "category")?,
        None => EventCategory::default(),
    };

    let mut list = load_events(conn)?;
    let event = list.add(
        title,
        date,
        opt_str(req, "time"),
        opt_str(req, "description"),
        category,
    )?;
    save_events(conn, &list)?;
    log::info!("event {} added for {}", event.id, event.date);

    let mut out = agenda_json(&list, now)?;
    out["event"] = to_json(&event)?;
    Ok(out)
}

fn handle_delete(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let now = now_param(req)?;
    let id = get_str(req, "id")?;
    let mut list = load_events(conn)?;
    let removed = list.remove(id)?;
    save_events(conn, &list)?;

    let mut out = agenda_json(&list, now)?;
    out["removed"] = json!(removed.id);
    Ok(out)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "events.list" => handle_list(state, req),
        "events.create" => handle_create(state, req),
        "events.delete" => handle_delete(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
