//! User aggregate root.
//!
//! # Responsibility
//! - Own the full Days → Activities tree for one account.
//! - Enforce day uniqueness per calendar date at the aggregate boundary.
//! - Validate registration input before an account enters storage.
//!
//! # Invariants
//! - `email` is stored lowercased; identity comparison is case-insensitive.
//! - `day_or_create` never produces two days with the same key.
//! - The aggregate is mutated only through these methods and persisted as a
//!   whole document.

use crate::model::activity::ActivityId;
use crate::model::day::{Day, DayKey};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One account and its full activity history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Lowercased unique identity.
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    /// Opaque hash owned by the identity collaborator; never inspected here.
    #[serde(rename = "passwordHash")]
    pub password_hash: String,
    pub days: Vec<Day>,
}

impl User {
    /// Creates an account with an empty day collection.
    ///
    /// The email is lowercased here so every later lookup can compare
    /// directly.
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into().to_lowercase(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            password_hash: password_hash.into(),
            days: Vec::new(),
        }
    }

    /// Looks up the day for a calendar date.
    pub fn day(&self, key: DayKey) -> Option<&Day> {
        self.days.iter().find(|day| day.date == key)
    }

    /// Mutable lookup used by delete paths, which must not create days.
    pub fn day_mut(&mut self, key: DayKey) -> Option<&mut Day> {
        self.days.iter_mut().find(|day| day.date == key)
    }

    /// Finds the day for a date, creating an empty one at the end of the
    /// sequence when absent.
    ///
    /// # Contract
    /// - Idempotent: a second call with the same key returns the same day,
    ///   never a duplicate.
    /// - Never fails on a valid key.
    pub fn day_or_create(&mut self, key: DayKey) -> &mut Day {
        let position = self.days.iter().position(|day| day.date == key);
        let index = match position {
            Some(index) => index,
            None => {
                self.days.push(Day::new(key));
                self.days.len() - 1
            }
        };
        &mut self.days[index]
    }

    /// Iterates every activity id in the aggregate, across all days.
    pub fn activity_ids(&self) -> impl Iterator<Item = ActivityId> + '_ {
        self.days
            .iter()
            .flat_map(|day| day.activities.iter())
            .map(|activity| activity.activity_id)
    }
}

/// Registration input for one new account.
///
/// Password hashing happens in the identity collaborator; this layer only
/// stores the opaque result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// Validation failure for registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidEmail { email: String },
    MissingName,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail { email } => write!(f, "not a valid email: `{email}`"),
            Self::MissingName => write!(f, "first and last name must not be empty"),
        }
    }
}

impl Error for UserValidationError {}

impl NewUser {
    /// Checks registration input before any account is created.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if !self.email.contains('@') {
            return Err(UserValidationError::InvalidEmail {
                email: self.email.clone(),
            });
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(UserValidationError::MissingName);
        }
        Ok(())
    }

    /// Builds the initial aggregate for a validated registration.
    pub fn into_user(self) -> User {
        User::new(
            self.email,
            self.first_name,
            self.last_name,
            self.password_hash,
        )
    }
}
