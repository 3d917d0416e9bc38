//! Drill - Test runner front end.
//!
//! Drill decides how a test run is carried out: through an already-running
//! DRb test server (falling back to a local run when none is listening), as
//! a bisection search for the minimal failing set, or as one of the small
//! housekeeping modes (`--init`, `--version`, `--help`).
//!
//! # Modules
//!
//! - [`cli`] - Argument parsing and [`cli::ConfigurationOptions`]
//! - [`config`] - The `.drill.yml` test configuration
//! - [`error`] - Error types and result aliases
//! - [`invocations`] - The invocation strategies and their dispatcher
//! - [`runner`] - Collaborators the strategies call into
//!
//! # Example
//!
//! ```
//! use drill::cli::ConfigurationOptions;
//! use drill::invocations::{Invocation, PrintVersion};
//!
//! let mut out = Vec::new();
//! let code = PrintVersion
//!     .call(&ConfigurationOptions::default(), &mut Vec::new(), &mut out)
//!     .unwrap();
//! assert_eq!(code, 0);
//! assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", drill::DRILL_VERSION));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod invocations;
pub mod runner;
pub mod version;

pub use error::{DrillError, Result};
pub use version::DRILL_VERSION;
