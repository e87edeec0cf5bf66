use crate::book::{NewSubject, SemesterBook, SubjectEdit};
use crate::ipc::error::{respond, ApiError};
use crate::ipc::helpers::{get_str, get_typed, load_book, opt_str, require_db, save_book, to_json};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn book_snapshot(book: &SemesterBook) -> Result<serde_json::Value, ApiError> {
    Ok(json!({
        "semesters": to_json(&book.semesters())?,
        "cgpa": book.cgpa(),
        "totalCredits": book.total_credits(),
    }))
}

fn semester_gpa(book: &SemesterBook, semester_id: &str) -> f64 {
    book.semester(semester_id).map(|s| s.gpa()).unwrap_or(0.0)
}

fn handle_list(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, ApiError> {
    let Some(conn) = state.db.as_ref() else {
        return book_snapshot(&SemesterBook::new());
    };
    book_snapshot(&load_book(conn)?)
}

fn handle_create(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let mut book = load_book(conn)?;
    let semester = book.add_semester(opt_str(req, "name")).clone();
    save_book(conn, &book)?;
    Ok(json!({ "semester": to_json(&semester)? }))
}

fn handle_rename(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let semester_id = get_str(req, "semesterId")?;
    let name = get_str(req, "name")?;
    let mut book = load_book(conn)?;
    book.rename_semester(semester_id, name)?;
    save_book(conn, &book)?;
    Ok(json!({ "ok": true }))
}

fn handle_delete(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let semester_id = get_str(req, "semesterId")?;
    let mut book = load_book(conn)?;
    let removed = book.remove_semester(semester_id)?;
    save_book(conn, &book)?;
    log::info!(
        "semester {} removed with {} subjects",
        removed.id,
        removed.subjects().len()
    );
    Ok(json!({ "ok": true, "cgpa": book.cgpa() }))
}

fn handle_subject_add(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let semester_id = get_str(req, "semesterId")?;
    let input: NewSubject = get_typed(req, "subject")?;
    let mut book = load_book(conn)?;
    let subject = book.add_subject(semester_id, input)?;
    save_book(conn, &book)?;
    Ok(json!({
        "subject": to_json(&subject)?,
        "semesterGpa": semester_gpa(&book, semester_id),
    }))
}

fn handle_subject_update(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let semester_id = get_str(req, "semesterId")?;
    let subject_id = get_str(req, "subjectId")?;
    let edit: SubjectEdit = get_typed(req, "edit")?;
    let mut book = load_book(conn)?;
    let subject = book.update_subject(semester_id, subject_id, edit)?;
    save_book(conn, &book)?;
    Ok(json!({
        "subject": to_json(&subject)?,
        "semesterGpa": semester_gpa(&book, semester_id),
    }))
}

fn handle_subject_delete(state: &mut AppState, req: &Request) -> Result<serde_json::Value, ApiError> {
    let conn = require_db(state)?;
    let semester_id = get_str(req, "semesterId")?;
    let subject_id = get_str(req, "subjectId")?;
    let mut book = load_book(conn)?;
    book.remove_subject(semester_id, subject_id)?;
    save_book(conn, &book)?;
    Ok(json!({ "semesterGpa": semester_gpa(&book, semester_id) }))
}

fn handle_summary(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, ApiError> {
    let book = match state.db.as_ref() {
        Some(conn) => load_book(conn)?,
        None => SemesterBook::new(),
    };
    let subject_count: usize = book.semesters().iter().map(|s| s.subjects().len()).sum();
    Ok(json!({
        "cgpa": book.cgpa(),
        "totalCredits": book.total_credits(),
        "semesterCount": book.semesters().len(),
        "subjectCount": subject_count,
        "trend": to_json(&book.trend())?,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "semesters.list" => handle_list(state, req),
        "semesters.create" => handle_create(state, req),
        "semesters.rename" => handle_rename(state, req),
        "semesters.delete" => handle_delete(state, req),
        "semesters.summary" => handle_summary(state, req),
        "subjects.add" => handle_subject_add(state, req),
        "subjects.update" => handle_subject_update(state, req),
        "subjects.delete" => handle_subject_delete(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
