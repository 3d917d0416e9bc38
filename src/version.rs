//! Drill version information.
//!
//! The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile
//! time. Prefer this constant over repeating `env!("CARGO_PKG_VERSION")`.

/// The Drill version string (for example, `0.4.0`).
pub const DRILL_VERSION: &str = env!("CARGO_PKG_VERSION");
