//! Core domain logic for the fitness log backend.
//! This crate is the single source of truth for the day/activity aggregate
//! invariants: one day per calendar date, stable activity identity, and
//! whole-aggregate persistence.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{
    Activity, ActivityDraft, ActivityId, ActivityValidationError, Routine, Set, Weight,
};
pub use model::day::{Day, DayKey, DayKeyError};
pub use model::user::{NewUser, User, UserValidationError};
pub use repo::user_repo::{
    RepoError, RepoResult, SqliteUserRepository, UserRecord, UserRepository,
};
pub use service::activity_service::{ActivityService, ErrorClass, ServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
