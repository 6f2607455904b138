//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `fitlog_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("fitlog_core version={}", fitlog_core::core_version());
    println!(
        "fitlog_core default_log_level={}",
        fitlog_core::default_log_level()
    );
}
