//! Collaborators the invocation strategies orchestrate.
//!
//! The strategies never run tests, search for failures, or scaffold
//! projects themselves. They call into the traits defined here:
//!
//! - [`TestRun`] - a single, already-constructed test run
//! - [`RemoteRunnerFactory`] - connects to a DRb test server
//! - [`LocalRunnerFactory`] - builds an in-process run
//! - [`BisectCoordinator`] - performs the bisection search
//! - [`Scaffolder`] - writes the project skeleton
//!
//! Default implementations live in the submodules; [`mock`] provides
//! recording doubles for tests.

pub mod bisect;
pub mod drb;
pub mod init;
pub mod local;
pub mod mock;

use std::io::Write;

use crate::cli::ConfigurationOptions;
use crate::config::TestConfiguration;
use crate::error::Result;

pub use bisect::{bisect_argv, BisectFormatter, CommandCoordinator};
pub use drb::{drb_argv, DrbClient, DrbRunnerFactory};
pub use init::ProjectInitializer;
pub use local::{ProcessRunner, ProcessRunnerFactory};

/// A constructed test run, ready to execute once.
pub trait TestRun {
    /// Execute the run, writing to the given streams.
    ///
    /// # Returns
    ///
    /// The run's exit code.
    fn run(&mut self, err: &mut dyn Write, out: &mut dyn Write) -> Result<i32>;
}

/// Builds clients for a remote (DRb) test server.
pub trait RemoteRunnerFactory {
    /// Connect to the server for the given options.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DrillError::DrbConnection`] when no server is reachable.
    fn connect(&self, options: &ConfigurationOptions) -> Result<Box<dyn TestRun>>;
}

/// Builds in-process test runs.
pub trait LocalRunnerFactory {
    /// Build a local run for the given options.
    fn build(&self, options: &ConfigurationOptions) -> Result<Box<dyn TestRun>>;
}

/// Performs the bisection search.
pub trait BisectCoordinator {
    /// Search for the minimal reproduction of a failure.
    ///
    /// # Returns
    ///
    /// `true` if the search succeeded.
    fn bisect_with(
        &self,
        args: &[String],
        configuration: &TestConfiguration,
        formatter: BisectFormatter,
    ) -> Result<bool>;
}

/// Writes the files a new project needs.
pub trait Scaffolder {
    /// Scaffold the project.
    fn run(&self) -> Result<()>;
}
