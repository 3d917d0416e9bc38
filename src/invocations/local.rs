//! Plain local run, the default when no other mode is requested.

use std::io::Write;

use crate::cli::ConfigurationOptions;
use crate::error::Result;
use crate::runner::LocalRunnerFactory;

use super::Invocation;

/// Builds a local run and returns its exit code.
pub struct LocalRun<'a> {
    local: &'a dyn LocalRunnerFactory,
}

impl<'a> LocalRun<'a> {
    /// Create the strategy.
    pub fn new(local: &'a dyn LocalRunnerFactory) -> Self {
        Self { local }
    }
}

impl Invocation for LocalRun<'_> {
    fn call(
        &self,
        options: &ConfigurationOptions,
        err: &mut dyn Write,
        out: &mut dyn Write,
    ) -> Result<i32> {
        let mut run = self.local.build(options)?;
        run.run(err, out)
    }
}
