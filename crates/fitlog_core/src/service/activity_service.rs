//! Aggregate mutation orchestrator.
//!
//! # Responsibility
//! - Provide the single entry point per request kind: register, resolve,
//!   add activity, delete activity.
//! - Compose identity resolution, day location, activity mutation and
//!   whole-aggregate persistence under one flow per request.
//!
//! # Invariants
//! - Every lookup and mutation is scoped to the user resolved from the
//!   request email; no cross-aggregate access exists.
//! - A request either persists the whole mutated aggregate or leaves storage
//!   untouched; a failed persist never reports success.
//! - Mutation-by-append may create a day; mutation-by-delete never does.

use crate::model::activity::{ActivityDraft, ActivityId, ActivityValidationError};
use crate::model::day::{DayKey, DayKeyError};
use crate::model::user::{NewUser, User, UserValidationError};
use crate::repo::user_repo::{RepoError, UserRecord, UserRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Bounded retries of the read-modify-write cycle when a concurrent writer
/// moved the aggregate between our read and our persist.
const MAX_PERSIST_ATTEMPTS: u32 = 3;

/// Coarse classification for the transport layer, so HTTP glue can map
/// outcomes to 404/400/500 without matching on variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    BadRequest,
    Internal,
}

/// Request-level failure taxonomy.
///
/// The three not-found variants render the exact messages the API contract
/// promises (`User not found`, `Date not found`, `Activity not found`).
#[derive(Debug)]
pub enum ServiceError {
    UserNotFound,
    DateNotFound,
    ActivityNotFound,
    InvalidDate(DayKeyError),
    InvalidActivity(ActivityValidationError),
    Validation(UserValidationError),
    EmailTaken,
    Storage(RepoError),
}

impl ServiceError {
    pub fn classification(&self) -> ErrorClass {
        match self {
            Self::UserNotFound | Self::DateNotFound | Self::ActivityNotFound => {
                ErrorClass::NotFound
            }
            Self::InvalidDate(_)
            | Self::InvalidActivity(_)
            | Self::Validation(_)
            | Self::EmailTaken => ErrorClass::BadRequest,
            Self::Storage(_) => ErrorClass::Internal,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserNotFound => write!(f, "User not found"),
            Self::DateNotFound => write!(f, "Date not found"),
            Self::ActivityNotFound => write!(f, "Activity not found"),
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::InvalidActivity(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmailTaken => write!(f, "User already registered with this email!"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDate(err) => Some(err),
            Self::InvalidActivity(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::UserNotFound
            | Self::DateNotFound
            | Self::ActivityNotFound
            | Self::EmailTaken => None,
        }
    }
}

/// Orchestrator over one user-aggregate repository.
pub struct ActivityService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> ActivityService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new account with an empty day collection.
    ///
    /// # Contract
    /// - Validation runs before any storage write.
    /// - A duplicate email surfaces as `EmailTaken`, not a transport error.
    pub fn register(&self, new_user: NewUser) -> Result<(), ServiceError> {
        new_user.validate().map_err(ServiceError::Validation)?;

        match self.repo.insert_user(&new_user) {
            Ok(()) => {
                info!("event=register module=service status=ok");
                Ok(())
            }
            Err(RepoError::AlreadyExists(_)) => Err(ServiceError::EmailTaken),
            Err(RepoError::Validation(err)) => Err(ServiceError::Validation(err)),
            Err(err) => Err(ServiceError::Storage(err)),
        }
    }

    /// Resolves the aggregate for an authenticated principal's email.
    ///
    /// Matching is case-insensitive; a missing account is the reportable
    /// `UserNotFound`, not a fatal error.
    pub fn user(&self, email: &str) -> Result<User, ServiceError> {
        Ok(self.resolve(email)?.user)
    }

    /// Records one activity under the given calendar date.
    ///
    /// # Contract
    /// - The user is resolved before the date is interpreted; an unknown
    ///   principal fails `UserNotFound` regardless of payload validity.
    /// - The day is found or lazily created; calling twice with the same new
    ///   date yields one day holding two activities, never two days.
    /// - The draft is validated before any mutation (all-or-nothing).
    /// - Returns the updated aggregate on success.
    pub fn add_activity(
        &self,
        email: &str,
        date: &str,
        draft: &ActivityDraft,
    ) -> Result<User, ServiceError> {
        draft.validate().map_err(ServiceError::InvalidActivity)?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let record = self.resolve(email)?;
            let mut user = record.user;
            let key: DayKey = date.parse().map_err(ServiceError::InvalidDate)?;

            let day = user.day_or_create(key);
            let activity_id = day.append_activity(draft.clone()).activity_id;

            match self.repo.replace_user(&user, record.version) {
                Ok(_) => {
                    info!(
                        "event=add_activity module=service status=ok date={key} activity_id={activity_id} attempt={attempt}"
                    );
                    return Ok(user);
                }
                Err(err) => self.handle_persist_failure("add_activity", err, attempt)?,
            }
        }
    }

    /// Removes one activity by id from the day for the given date.
    ///
    /// # Contract
    /// - The user is resolved before the date is interpreted; an unknown
    ///   principal fails `UserNotFound` regardless of date or id validity.
    /// - A date without a stored day fails `DateNotFound`; delete never
    ///   creates days. An unparseable date cannot name a stored day and
    ///   reports the same way.
    /// - An id missing from that day fails `ActivityNotFound`, even when it
    ///   exists under another date.
    /// - Removing the last activity leaves the emptied day in place.
    /// - Returns the updated aggregate on success.
    pub fn delete_activity(
        &self,
        email: &str,
        date: &str,
        activity_id: ActivityId,
    ) -> Result<User, ServiceError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let record = self.resolve(email)?;
            let mut user = record.user;
            let key: DayKey = date.parse().map_err(|_| ServiceError::DateNotFound)?;

            let day = user.day_mut(key).ok_or(ServiceError::DateNotFound)?;
            if day.remove_activity(activity_id).is_none() {
                return Err(ServiceError::ActivityNotFound);
            }

            match self.repo.replace_user(&user, record.version) {
                Ok(_) => {
                    info!(
                        "event=delete_activity module=service status=ok date={key} activity_id={activity_id} attempt={attempt}"
                    );
                    return Ok(user);
                }
                Err(err) => self.handle_persist_failure("delete_activity", err, attempt)?,
            }
        }
    }

    fn resolve(&self, email: &str) -> Result<UserRecord, ServiceError> {
        match self.repo.find_by_email(email) {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(ServiceError::UserNotFound),
            Err(err) => Err(ServiceError::Storage(err)),
        }
    }

    /// Retries the whole read-modify-write cycle on a version conflict,
    /// bounded by `MAX_PERSIST_ATTEMPTS`; everything else propagates.
    fn handle_persist_failure(
        &self,
        operation: &str,
        err: RepoError,
        attempt: u32,
    ) -> Result<(), ServiceError> {
        match err {
            RepoError::VersionConflict { .. } if attempt < MAX_PERSIST_ATTEMPTS => {
                warn!(
                    "event={operation} module=service status=retry reason=version_conflict attempt={attempt}"
                );
                Ok(())
            }
            RepoError::NotFound(_) => Err(ServiceError::UserNotFound),
            other => Err(ServiceError::Storage(other)),
        }
    }
}
