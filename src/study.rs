use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Sessions shorter than this are dropped.
pub const MIN_SESSION_SECONDS: i64 = 10;
/// A day counts towards the streak once it has this much study time.
pub const STREAK_DAY_SECONDS: i64 = 60;
pub const DEFAULT_DAILY_GOAL_SECONDS: i64 = 4 * 3600;
const WEEK_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub subject: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Seconds actually studied; pauses make this shorter than end - start.
    pub duration: i64,
}

impl StudySession {
    pub fn new(
        subject: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        duration: Option<i64>,
    ) -> Self {
        let duration = duration.unwrap_or_else(|| (end_time - start_time).num_seconds());
        Self {
            id: Uuid::new_v4().to_string(),
            subject: subject.to_string(),
            start_time,
            end_time,
            duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStudy {
    pub date: NaiveDate,
    pub total_seconds: i64,
    #[serde(default)]
    pub sessions: Vec<StudySession>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySummary {
    pub today_seconds: i64,
    pub week_seconds: i64,
    pub streak_days: i64,
    pub goal_progress: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudyHistory {
    days: Vec<DailyStudy>,
}

impl StudyHistory {
    pub fn days(&self) -> &[DailyStudy] {
        &self.days
    }

    /// Files the session under the day it ended on. Returns false when the
    /// session is too short to keep.
    pub fn record(&mut self, session: StudySession) -> bool {
        if session.duration < MIN_SESSION_SECONDS {
            return false;
        }
        let date = session.end_time.date_naive();
        match self.days.iter_mut().find(|d| d.date == date) {
            Some(day) => {
                day.total_seconds = day.total_seconds.saturating_add(session.duration);
                day.sessions.push(session);
            }
            None => self.days.push(DailyStudy {
                date,
                total_seconds: session.duration,
                sessions: vec![session],
            }),
        }
        true
    }

    fn totals_by_date(&self) -> HashMap<NaiveDate, i64> {
        let mut totals: HashMap<NaiveDate, i64> = HashMap::new();
        for d in &self.days {
            let total = totals.entry(d.date).or_insert(0);
            *total = total.saturating_add(d.total_seconds);
        }
        totals
    }

    pub fn summarize(&self, today: NaiveDate, daily_goal_seconds: i64) -> StudySummary {
        let totals = self.totals_by_date();
        let today_seconds = totals.get(&today).copied().unwrap_or(0);
        let week_seconds = totals
            .iter()
            .filter(|(date, _)| {
                let age = (today - **date).num_days();
                (0..=WEEK_DAYS).contains(&age)
            })
            .fold(0_i64, |acc, (_, secs)| acc.saturating_add(*secs));

        // Recorded days newest first; unrecorded calendar days do not break it.
        let mut recorded: Vec<(NaiveDate, i64)> = totals
            .iter()
            .filter(|(date, _)| **date <= today)
            .map(|(date, secs)| (*date, *secs))
            .collect();
        recorded.sort_by(|a, b| b.0.cmp(&a.0));
        let streak_days = recorded
            .iter()
            .take_while(|(_, secs)| *secs >= STREAK_DAY_SECONDS)
            .count() as i64;

        let goal_progress = if daily_goal_seconds > 0 {
            (today_seconds as f64 / daily_goal_seconds as f64).min(1.0)
        } else {
            0.0
        };

        StudySummary {
            today_seconds,
            week_seconds,
            streak_days,
            goal_progress,
        }
    }
}
