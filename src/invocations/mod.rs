//! Invocation strategies.
//!
//! Each run mode of `drill` is an invocation strategy implementing the
//! [`Invocation`] trait: it receives the parsed options and the error and
//! output streams, and returns the process exit code.
//!
//! # Architecture
//!
//! The set of strategies is closed. [`InvocationStrategy`] enumerates them
//! and [`InvocationDispatcher`] picks exactly one per invocation, so adding a
//! mode means adding a variant and the compiler points at every match that
//! needs it.

pub mod bisect;
pub mod dispatcher;
pub mod drb;
pub mod help;
pub mod initialize;
pub mod local;
pub mod version;

use std::io::Write;

use crate::cli::ConfigurationOptions;
use crate::error::Result;

pub use bisect::Bisect;
pub use dispatcher::{Collaborators, InvocationDispatcher};
pub use drb::{DrbWithFallback, NO_DRB_SERVER_MESSAGE};
pub use help::{filter_help, PrintHelp};
pub use initialize::InitializeProject;
pub use local::LocalRun;
pub use version::PrintVersion;

/// Exit code of a successful invocation.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code of a failed invocation.
pub const EXIT_FAILURE: i32 = 1;

/// Trait for invocation strategies.
pub trait Invocation {
    /// Execute the strategy.
    ///
    /// # Arguments
    ///
    /// * `options` - Parsed configuration options
    /// * `err` - Error stream, borrowed for this call only
    /// * `out` - Output stream, borrowed for this call only
    ///
    /// # Returns
    ///
    /// The exit code for the process.
    fn call(
        &self,
        options: &ConfigurationOptions,
        err: &mut dyn Write,
        out: &mut dyn Write,
    ) -> Result<i32>;
}

/// The strategy selected for one invocation.
pub enum InvocationStrategy<'a> {
    InitializeProject(InitializeProject<'a>),
    DrbWithFallback(DrbWithFallback<'a>),
    Bisect(Bisect<'a>),
    PrintVersion(PrintVersion),
    PrintHelp(PrintHelp),
    LocalRun(LocalRun<'a>),
}

impl InvocationStrategy<'_> {
    /// Short name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitializeProject(_) => "initialize-project",
            Self::DrbWithFallback(_) => "drb-with-fallback",
            Self::Bisect(_) => "bisect",
            Self::PrintVersion(_) => "print-version",
            Self::PrintHelp(_) => "print-help",
            Self::LocalRun(_) => "local-run",
        }
    }
}

impl std::fmt::Debug for InvocationStrategy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("InvocationStrategy").field(&self.name()).finish()
    }
}

impl Invocation for InvocationStrategy<'_> {
    fn call(
        &self,
        options: &ConfigurationOptions,
        err: &mut dyn Write,
        out: &mut dyn Write,
    ) -> Result<i32> {
        match self {
            Self::InitializeProject(strategy) => strategy.call(options, err, out),
            Self::DrbWithFallback(strategy) => strategy.call(options, err, out),
            Self::Bisect(strategy) => strategy.call(options, err, out),
            Self::PrintVersion(strategy) => strategy.call(options, err, out),
            Self::PrintHelp(strategy) => strategy.call(options, err, out),
            Self::LocalRun(strategy) => strategy.call(options, err, out),
        }
    }
}
