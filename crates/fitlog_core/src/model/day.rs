//! Day domain model and canonical day key.
//!
//! # Responsibility
//! - Define the date-keyed container of activities for one user.
//! - Normalize incoming date strings to one canonical day-granularity key.
//!
//! # Invariants
//! - `DayKey` equality is calendar-date equality; two timestamps on the same
//!   UTC calendar day map to the same key.
//! - A day keeps activity insertion order; removal closes the gap and leaves
//!   the other activities' ids and order untouched.
//! - A day is never deleted by removing its last activity.

use crate::model::activity::{Activity, ActivityDraft, ActivityId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Canonical day-granularity key for one calendar date.
///
/// Serialized as `YYYY-MM-DD`. Construction goes through `FromStr`, which
/// also accepts RFC 3339 timestamps and truncates them to the UTC calendar
/// date, so time-of-day and timezone offsets never produce distinct keys for
/// the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DayKey(pub NaiveDate);

/// Rejection of a date string that is neither a calendar date nor a
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayKeyError {
    pub input: String,
}

impl Display for DayKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "not a calendar date: `{}`", self.input)
    }
}

impl Error for DayKeyError {}

impl FromStr for DayKey {
    type Err = DayKeyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(instant.with_timezone(&Utc).date_naive()));
        }
        Err(DayKeyError {
            input: value.to_string(),
        })
    }
}

impl Display for DayKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Date-keyed container of recorded activities for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub date: DayKey,
    pub activities: Vec<Activity>,
}

impl Day {
    /// Creates an empty day for the given date.
    pub fn new(date: DayKey) -> Self {
        Self {
            date,
            activities: Vec::new(),
        }
    }

    /// Appends a new activity built from the draft and returns it.
    ///
    /// # Contract
    /// - Assigns a fresh stable id; the caller never supplies one.
    /// - Appends at the end of the sequence (insertion order is display
    ///   order).
    pub fn append_activity(&mut self, draft: ActivityDraft) -> &Activity {
        self.activities.push(draft.into_activity());
        let index = self.activities.len() - 1;
        &self.activities[index]
    }

    /// Looks up one activity by exact id match.
    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities
            .iter()
            .find(|activity| activity.activity_id == id)
    }

    /// Removes one activity by id, returning it.
    ///
    /// Returns `None` when no activity carries the id. The remaining
    /// activities keep their ids and relative order; the day itself stays,
    /// even when this removal empties it.
    pub fn remove_activity(&mut self, id: ActivityId) -> Option<Activity> {
        let position = self
            .activities
            .iter()
            .position(|activity| activity.activity_id == id)?;
        Some(self.activities.remove(position))
    }
}
