use crate::ipc::error::{respond, ApiError};
use crate::ipc::helpers::{get_str, load_book, opt_str, require_db, save_book, to_json};
use crate::ipc::types::{AppState, Request};
use crate::transcript;
use serde_json::json;

fn handle_import(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let text = get_str(req, "text")?;

    let subjects = transcript::parse_transcript(text);
    if subjects.is_empty() {
        return Err(ApiError::new(
            "no_subjects",
            "could not detect any subjects in the transcript text",
        )
        .with_details(json!({ "lineCount": text.lines().count() })));
    }

    let mut book = load_book(conn)?;
    let semester = book.push_semester(opt_str(req, "name"), subjects).clone();
    save_book(conn, &book)?;
    log::info!(
        "transcript import created semester {} with {} subjects",
        semester.id,
        semester.subjects().len()
    );
    Ok(json!({ "semester": to_json(&semester)?, "cgpa": book.cgpa() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "transcript.import" => handle_import(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
