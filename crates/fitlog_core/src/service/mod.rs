//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate identity resolution, aggregate mutation and persistence
//!   into per-request entry points.
//! - Keep HTTP/UI layers decoupled from storage details.

pub mod activity_service;
