use anyhow::Context;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

pub const DB_FILE: &str = "uthmhub.sqlite3";
pub const SEMESTERS_KEY: &str = "uthmhub-semesters";
pub const STUDY_HISTORY_KEY: &str = "uthmhub-study-history";
pub const EVENTS_KEY: &str = "uthmhub-user-events";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace).with_context(|| {
        format!(
            "failed to create workspace {}",
            workspace.to_string_lossy()
        )
    })?;
    let db_path = workspace.join(DB_FILE);
    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.to_string_lossy()))?;

    // Plain JSON blobs keyed by application key; no schema beyond that.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv(
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT
        )",
        [],
    )?;
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings(
            key TEXT PRIMARY KEY,
            value_json TEXT NOT NULL
        )",
        [],
    )?;

    Ok(conn)
}

pub fn kv_get_json(conn: &Connection, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM kv WHERE key = ?", [key], |r| r.get(0))
        .optional()?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).with_context(|| format!("kv {} is not valid json", key))?;
    Ok(Some(value))
}

pub fn kv_set_json(conn: &Connection, key: &str, value: &serde_json::Value) -> anyhow::Result<()> {
    let updated_at = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO kv(key, value, updated_at) VALUES(?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        (key, value.to_string(), updated_at),
    )?;
    Ok(())
}

/// Loads a typed value stored under `key`, or `T::default()` when absent.
pub fn kv_load<T>(conn: &Connection, key: &str) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    match kv_get_json(conn, key)? {
        Some(v) => serde_json::from_value(v).with_context(|| format!("kv {} has unexpected shape", key)),
        None => Ok(T::default()),
    }
}

pub fn kv_store<T: serde::Serialize>(conn: &Connection, key: &str, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_value(value).with_context(|| format!("failed to serialize {}", key))?;
    kv_set_json(conn, key, &json)
}

pub fn settings_get_json(conn: &Connection, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
    let raw: Option<String> = conn
        .query_row("SELECT value_json FROM settings WHERE key = ?", [key], |r| {
            r.get(0)
        })
        .optional()?;
    match raw {
        Some(s) => Ok(Some(serde_json::from_str(&s)?)),
        None => Ok(None),
    }
}

pub fn settings_set_json(conn: &Connection, key: &str, value: &serde_json::Value) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value_json) VALUES(?, ?)
         ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json",
        (key, value.to_string()),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::SemesterBook;
    use serde_json::json;

    fn temp_workspace(prefix: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4()))
    }

    #[test]
    fn kv_and_settings_round_trip() {
        let ws = temp_workspace("uthmhub-db");
        let conn = open_db(&ws).expect("open");
        assert_eq!(kv_get_json(&conn, SEMESTERS_KEY).expect("get"), None);

        kv_set_json(&conn, "k", &json!({ "a": 1 })).expect("set");
        kv_set_json(&conn, "k", &json!({ "a": 2 })).expect("overwrite");
        assert_eq!(kv_get_json(&conn, "k").expect("get"), Some(json!({ "a": 2 })));

        settings_set_json(&conn, "study.dailyGoalSeconds", &json!(3600)).expect("set");
        assert_eq!(
            settings_get_json(&conn, "study.dailyGoalSeconds").expect("get"),
            Some(json!(3600))
        );
        let _ = std::fs::remove_dir_all(&ws);
    }

    #[test]
    fn typed_load_defaults_when_missing() {
        let ws = temp_workspace("uthmhub-db-typed");
        let conn = open_db(&ws).expect("open");
        let mut book: SemesterBook = kv_load(&conn, SEMESTERS_KEY).expect("load");
        assert!(book.semesters().is_empty());
        book.add_semester(None);
        kv_store(&conn, SEMESTERS_KEY, &book).expect("store");
        let again: SemesterBook = kv_load(&conn, SEMESTERS_KEY).expect("reload");
        assert_eq!(again, book);
        let _ = std::fs::remove_dir_all(&ws);
    }
}
