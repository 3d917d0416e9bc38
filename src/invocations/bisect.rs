//! Launch a bisection search.

use std::io::Write;

use crate::cli::{ConfigurationOptions, OptionValue};
use crate::config::TestConfiguration;
use crate::error::Result;
use crate::runner::{BisectCoordinator, BisectFormatter};

use super::{Invocation, EXIT_FAILURE, EXIT_SUCCESS};

/// Pick the formatter for the `bisect` option value.
///
/// Only the literal `verbose` selects debug output; absent, `false`, or any
/// other value means standard progress.
pub fn formatter_for(bisect: Option<&OptionValue>) -> BisectFormatter {
    match bisect.and_then(OptionValue::as_text) {
        Some("verbose") => BisectFormatter::DebugProgress,
        _ => BisectFormatter::Progress,
    }
}

/// Delegates to the bisection coordinator and maps its verdict to an exit code.
pub struct Bisect<'a> {
    coordinator: &'a dyn BisectCoordinator,
    configuration: &'a TestConfiguration,
}

impl<'a> Bisect<'a> {
    /// Create the strategy with the coordinator and the test configuration
    /// it passes along.
    pub fn new(
        coordinator: &'a dyn BisectCoordinator,
        configuration: &'a TestConfiguration,
    ) -> Self {
        Self {
            coordinator,
            configuration,
        }
    }
}

impl Invocation for Bisect<'_> {
    fn call(
        &self,
        options: &ConfigurationOptions,
        _err: &mut dyn Write,
        _out: &mut dyn Write,
    ) -> Result<i32> {
        let formatter = formatter_for(options.get("bisect"));
        let success =
            self.coordinator
                .bisect_with(options.args(), self.configuration, formatter)?;

        tracing::debug!(
            "Bisect finished ({} formatter): success={}",
            formatter.name(),
            success
        );
        Ok(if success { EXIT_SUCCESS } else { EXIT_FAILURE })
    }
}
