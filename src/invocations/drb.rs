//! Run through a DRb server, falling back to a local run.

use std::io::Write;

use crate::cli::ConfigurationOptions;
use crate::error::{DrillError, Result};
use crate::runner::{LocalRunnerFactory, RemoteRunnerFactory};

use super::Invocation;

/// Printed on the error stream when the fallback kicks in.
///
/// Tooling greps for this exact line.
pub const NO_DRB_SERVER_MESSAGE: &str =
    "No DRb server is running. Running in local process instead ...";

/// Tries the DRb server first; runs locally when none is reachable.
///
/// Only [`DrillError::DrbConnection`] triggers the fallback, and only once:
/// the local run's own errors are returned as they are. The connection
/// error is consumed before the local run starts, so nothing the local run
/// returns can carry it as a source.
pub struct DrbWithFallback<'a> {
    remote: &'a dyn RemoteRunnerFactory,
    local: &'a dyn LocalRunnerFactory,
}

impl<'a> DrbWithFallback<'a> {
    /// Create the strategy from its two runner factories.
    pub fn new(remote: &'a dyn RemoteRunnerFactory, local: &'a dyn LocalRunnerFactory) -> Self {
        Self { remote, local }
    }

    fn run_remote(
        &self,
        options: &ConfigurationOptions,
        err: &mut dyn Write,
        out: &mut dyn Write,
    ) -> Result<i32> {
        let mut client = self.remote.connect(options)?;
        client.run(err, out)
    }
}

impl Invocation for DrbWithFallback<'_> {
    fn call(
        &self,
        options: &ConfigurationOptions,
        err: &mut dyn Write,
        out: &mut dyn Write,
    ) -> Result<i32> {
        match self.run_remote(options, err, out) {
            Err(DrillError::DrbConnection { address, message }) => {
                tracing::debug!("DRb server at {} unreachable: {}", address, message);
                writeln!(err, "{NO_DRB_SERVER_MESSAGE}")?;
            }
            other => return other,
        }

        let mut local = self.local.build(options)?;
        local.run(err, out)
    }
}
