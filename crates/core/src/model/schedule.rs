use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::ids::SessionId;

/// Upper bound for a single study session.
pub const MAX_SESSION_MINUTES: u32 = 24 * 60;

/// A study session the learner planned on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSession {
    pub id: SessionId,
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub course: Option<String>,
    pub notes: String,
    /// Terminal once set.
    pub completed: bool,
}

impl ScheduledSession {
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// `None` when the end would fall past the representable calendar.
    #[must_use]
    pub fn ends_at(&self) -> Option<NaiveDateTime> {
        self.starts_at()
            .checked_add_signed(chrono::Duration::minutes(i64::from(self.duration_minutes)))
    }
}

/// Payload of `addScheduledSession`; the id is assigned by the schedule slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScheduledSession {
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(alias = "duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl NewScheduledSession {
    /// Validate and assign an id. Blank titles are rejected; duration is
    /// clamped to `1..=MAX_SESSION_MINUTES`.
    #[must_use]
    pub fn into_session(self, id: SessionId) -> Option<ScheduledSession> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        let course = self
            .course
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty());
        Some(ScheduledSession {
            id,
            title: title.to_owned(),
            date: self.date,
            time: self.time,
            duration_minutes: self.duration_minutes.clamp(1, MAX_SESSION_MINUTES),
            course,
            notes: self.notes,
            completed: false,
        })
    }
}
