//! Strategy selection.
//!
//! [`InvocationDispatcher`] maps parsed options onto exactly one
//! [`InvocationStrategy`]. The mapping is total: when no mode is requested
//! the suite simply runs locally.

use crate::cli::ConfigurationOptions;
use crate::config::TestConfiguration;
use crate::runner::{BisectCoordinator, LocalRunnerFactory, RemoteRunnerFactory, Scaffolder};

use super::{
    Bisect, DrbWithFallback, InitializeProject, InvocationStrategy, LocalRun, PrintHelp,
    PrintVersion,
};

/// Everything the strategies borrow for the duration of one invocation.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub remote: &'a dyn RemoteRunnerFactory,
    pub local: &'a dyn LocalRunnerFactory,
    pub coordinator: &'a dyn BisectCoordinator,
    pub scaffolder: &'a dyn Scaffolder,
    pub configuration: &'a TestConfiguration,
}

/// Selects the invocation strategy.
pub struct InvocationDispatcher<'a> {
    collaborators: Collaborators<'a>,
    usage: String,
    invalid_options: Vec<String>,
}

impl<'a> InvocationDispatcher<'a> {
    /// Create a dispatcher.
    ///
    /// # Arguments
    ///
    /// * `collaborators` - Runners, coordinator, scaffolder and configuration
    /// * `usage` - Usage text rendered by the option parser
    /// * `invalid_options` - Flags the parser rejects, hidden from `--help`
    pub fn new<S: AsRef<str>>(
        collaborators: Collaborators<'a>,
        usage: String,
        invalid_options: &[S],
    ) -> Self {
        Self {
            collaborators,
            usage,
            invalid_options: invalid_options
                .iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
        }
    }

    /// Select the strategy for the given options.
    ///
    /// Precedence: help, version, init, bisect, drb, then a local run.
    pub fn select(&self, options: &ConfigurationOptions) -> InvocationStrategy<'a> {
        let c = self.collaborators;
        let strategy = if options.is_set("help") {
            InvocationStrategy::PrintHelp(PrintHelp::new(
                self.usage.clone(),
                self.invalid_options.clone(),
            ))
        } else if options.is_set("version") {
            InvocationStrategy::PrintVersion(PrintVersion)
        } else if options.is_set("init") {
            InvocationStrategy::InitializeProject(InitializeProject::new(c.scaffolder))
        } else if options.is_set("bisect") {
            InvocationStrategy::Bisect(Bisect::new(c.coordinator, c.configuration))
        } else if options.is_set("drb") {
            InvocationStrategy::DrbWithFallback(DrbWithFallback::new(c.remote, c.local))
        } else {
            InvocationStrategy::LocalRun(LocalRun::new(c.local))
        };

        tracing::debug!("Selected invocation: {}", strategy.name());
        strategy
    }
}
