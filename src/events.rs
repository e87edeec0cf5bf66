//! User-entered deadlines (assignments, quizzes, ...) kept next to the
//! semester book.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Time used when an event is given as a bare date.
pub const DEFAULT_EVENT_TIME: &str = "09:00";
const EVENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    #[default]
    Assignment,
    Project,
    Quiz,
    Presentation,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    pub id: String,
    pub title: String,
    #[serde(with = "event_time")]
    pub date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: EventCategory,
}

/// Events on or after `now` are upcoming; both lists are sorted by date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAgenda {
    pub upcoming: Vec<UserEvent>,
    pub past: Vec<UserEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    MissingTitle,
    InvalidDate(String),
    NotFound(String),
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::MissingTitle => write!(f, "event title must not be empty"),
            EventError::InvalidDate(raw) => write!(f, "invalid event date: {}", raw),
            EventError::NotFound(id) => write!(f, "event not found: {}", id),
        }
    }
}

impl std::error::Error for EventError {}

/// Accepts `YYYY-MM-DDTHH:MM`, with optional seconds, or a bare
/// `YYYY-MM-DD` meaning midnight.
pub fn parse_event_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, EVENT_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

mod event_time {
    use super::{parse_event_time, EVENT_TIME_FORMAT};
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format(EVENT_TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_event_time(&raw).ok_or_else(|| de::Error::custom(format!("invalid event date {}", raw)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserEvents {
    events: Vec<UserEvent>,
}

impl UserEvents {
    /// `date` is either a full `YYYY-MM-DDTHH:MM` or a day, combined with
    /// `time` (default 09:00).
    pub fn add(
        &mut self,
        title: &str,
        date: &str,
        time: Option<&str>,
        description: Option<&str>,
        category: EventCategory,
    ) -> Result<UserEvent, EventError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EventError::MissingTitle);
        }
        let raw = if date.contains('T') {
            date.trim().to_string()
        } else {
            format!("{}T{}", date.trim(), time.unwrap_or(DEFAULT_EVENT_TIME).trim())
        };
        let when = parse_event_time(&raw).ok_or(EventError::InvalidDate(raw))?;

        let event = UserEvent {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            date: when,
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            category,
        };
        self.events.push(event.clone());
        Ok(event)
    }

    pub fn remove(&mut self, id: &str) -> Result<UserEvent, EventError> {
        let idx = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;
        Ok(self.events.remove(idx))
    }

    pub fn agenda(&self, now: NaiveDateTime) -> EventAgenda {
        let mut sorted = self.events.clone();
        sorted.sort_by_key(|e| e.date);
        let (upcoming, past) = sorted.into_iter().partition(|e| e.date >= now);
        EventAgenda { upcoming, past }
    }
}
