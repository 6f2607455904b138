//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the user aggregate.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - The aggregate is read and written whole; there is no field-level patch.
//! - Whole-document replaces are guarded by an optimistic version check.
//! - Repository APIs return semantic errors (`NotFound`, `VersionConflict`)
//!   in addition to DB transport errors.

pub mod user_repo;
