use serde::Serialize;
use serde_json::json;

/// A failed request, reported to the caller as `{ code, message, details? }`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::new("bad_params", message)
    }

    pub fn no_workspace() -> Self {
        Self::new("no_workspace", "select a workspace first")
    }
}

impl From<crate::book::BookError> for ApiError {
    fn from(e: crate::book::BookError) -> Self {
        ApiError::new("not_found", e.to_string())
    }
}

impl From<crate::events::EventError> for ApiError {
    fn from(e: crate::events::EventError) -> Self {
        use crate::events::EventError;
        match e {
            EventError::NotFound(_) => ApiError::new("not_found", e.to_string()),
            EventError::MissingTitle | EventError::InvalidDate(_) => ApiError::bad_params(e.to_string()),
        }
    }
}

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Wraps a handler outcome in the response envelope.
pub fn respond(id: &str, result: Result<serde_json::Value, ApiError>) -> serde_json::Value {
    match result {
        Ok(v) => ok(id, v),
        Err(e) => err(id, &e.code, e.message, e.details),
    }
}
