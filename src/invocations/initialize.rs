//! `drill --init`.

use std::io::Write;

use crate::cli::ConfigurationOptions;
use crate::error::Result;
use crate::runner::Scaffolder;

use super::{Invocation, EXIT_SUCCESS};

/// Runs the project scaffolder.
pub struct InitializeProject<'a> {
    scaffolder: &'a dyn Scaffolder,
}

impl<'a> InitializeProject<'a> {
    /// Create the strategy.
    pub fn new(scaffolder: &'a dyn Scaffolder) -> Self {
        Self { scaffolder }
    }
}

impl Invocation for InitializeProject<'_> {
    fn call(
        &self,
        _options: &ConfigurationOptions,
        _err: &mut dyn Write,
        _out: &mut dyn Write,
    ) -> Result<i32> {
        self.scaffolder.run()?;
        Ok(EXIT_SUCCESS)
    }
}
