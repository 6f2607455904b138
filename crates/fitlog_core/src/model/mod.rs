//! Domain model for the fitness log aggregate.
//!
//! # Responsibility
//! - Define the canonical aggregate shape: User → Days → Activities →
//!   Routines → Sets.
//! - Keep all aggregate mutation rules (day uniqueness, activity identity)
//!   in one place, independent of storage.
//!
//! # Invariants
//! - A user holds at most one `Day` per calendar date.
//! - Every `Activity` is identified by a stable `ActivityId` that is unique
//!   across the whole aggregate.
//! - Days and activities preserve insertion order; lookups go by key/id,
//!   never by position.

pub mod activity;
pub mod day;
pub mod user;
