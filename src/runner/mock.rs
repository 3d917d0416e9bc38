//! Recording collaborators for testing.
//!
//! Each mock records how it was called and replays a pre-configured
//! outcome. Mocks use interior mutability because the strategies only
//! borrow their collaborators.
//!
//! # Example
//!
//! ```
//! use drill::cli::ConfigurationOptions;
//! use drill::runner::mock::{MockOutcome, MockRunnerFactory};
//! use drill::runner::{LocalRunnerFactory, TestRun};
//!
//! let factory = MockRunnerFactory::new("local", MockOutcome::Exit(0));
//! let mut run = factory.build(&ConfigurationOptions::default()).unwrap();
//!
//! let mut out = Vec::new();
//! assert_eq!(run.run(&mut Vec::new(), &mut out).unwrap(), 0);
//! assert_eq!(String::from_utf8(out).unwrap(), "local out\n");
//! assert_eq!(factory.calls(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::io::Write;

use crate::cli::ConfigurationOptions;
use crate::config::TestConfiguration;
use crate::error::{DrillError, Result};

use super::{
    BisectCoordinator, BisectFormatter, LocalRunnerFactory, RemoteRunnerFactory, Scaffolder,
    TestRun,
};

/// What a mock does when invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOutcome {
    /// Succeed with this exit code.
    Exit(i32),
    /// Fail as if no DRb server were listening.
    ConnectionRefused,
    /// Fail with an unrelated error.
    UnexpectedState(String),
}

impl MockOutcome {
    fn into_result(self) -> Result<i32> {
        match self {
            Self::Exit(code) => Ok(code),
            Self::ConnectionRefused => Err(DrillError::DrbConnection {
                address: "127.0.0.1:8989".to_string(),
                message: "Connection refused (os error 111)".to_string(),
            }),
            Self::UnexpectedState(message) => Err(DrillError::UnexpectedState { message }),
        }
    }
}

/// When a mock factory fails: while constructing, or while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePoint {
    /// The factory itself returns the error.
    #[default]
    Construct,
    /// The factory succeeds and the run returns the error.
    Run,
}

/// Builds [`MockRun`]s; implements both runner factory traits.
#[derive(Debug)]
pub struct MockRunnerFactory {
    label: String,
    outcome: MockOutcome,
    failure_point: FailurePoint,
    calls: Cell<usize>,
    received: RefCell<Vec<ConfigurationOptions>>,
}

impl MockRunnerFactory {
    /// Create a factory whose runs write `<label> out`/`<label> err` lines.
    pub fn new(label: &str, outcome: MockOutcome) -> Self {
        Self {
            label: label.to_string(),
            outcome,
            failure_point: FailurePoint::default(),
            calls: Cell::new(0),
            received: RefCell::new(Vec::new()),
        }
    }

    /// Choose where an error outcome surfaces.
    pub fn failing_at(mut self, failure_point: FailurePoint) -> Self {
        self.failure_point = failure_point;
        self
    }

    /// How many runs were constructed (or attempted).
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// The options each construction received.
    pub fn received(&self) -> Vec<ConfigurationOptions> {
        self.received.borrow().clone()
    }

    fn make(&self, options: &ConfigurationOptions) -> Result<Box<dyn TestRun>> {
        self.calls.set(self.calls.get() + 1);
        self.received.borrow_mut().push(options.clone());

        let is_error = !matches!(self.outcome, MockOutcome::Exit(_));
        if is_error && self.failure_point == FailurePoint::Construct {
            self.outcome.clone().into_result()?;
        }

        Ok(Box::new(MockRun {
            label: self.label.clone(),
            outcome: self.outcome.clone(),
        }))
    }
}

impl RemoteRunnerFactory for MockRunnerFactory {
    fn connect(&self, options: &ConfigurationOptions) -> Result<Box<dyn TestRun>> {
        self.make(options)
    }
}

impl LocalRunnerFactory for MockRunnerFactory {
    fn build(&self, options: &ConfigurationOptions) -> Result<Box<dyn TestRun>> {
        self.make(options)
    }
}

/// A run that writes one line to each stream, then replays its outcome.
#[derive(Debug)]
pub struct MockRun {
    label: String,
    outcome: MockOutcome,
}

impl TestRun for MockRun {
    fn run(&mut self, err: &mut dyn Write, out: &mut dyn Write) -> Result<i32> {
        writeln!(out, "{} out", self.label)?;
        writeln!(err, "{} err", self.label)?;
        self.outcome.clone().into_result()
    }
}

/// One recorded `bisect_with` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BisectCall {
    pub args: Vec<String>,
    pub configuration: TestConfiguration,
    pub formatter: BisectFormatter,
}

/// Coordinator returning a fixed result.
#[derive(Debug, Default)]
pub struct MockCoordinator {
    success: bool,
    calls: RefCell<Vec<BisectCall>>,
}

impl MockCoordinator {
    /// Create a coordinator that reports `success`.
    pub fn new(success: bool) -> Self {
        Self {
            success,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<BisectCall> {
        self.calls.borrow().clone()
    }
}

impl BisectCoordinator for MockCoordinator {
    fn bisect_with(
        &self,
        args: &[String],
        configuration: &TestConfiguration,
        formatter: BisectFormatter,
    ) -> Result<bool> {
        self.calls.borrow_mut().push(BisectCall {
            args: args.to_vec(),
            configuration: configuration.clone(),
            formatter,
        });
        Ok(self.success)
    }
}

/// Scaffolder counting its runs.
#[derive(Debug, Default)]
pub struct MockScaffolder {
    fail: bool,
    runs: Cell<usize>,
}

impl MockScaffolder {
    /// A scaffolder that succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A scaffolder that fails with an IO error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            runs: Cell::new(0),
        }
    }

    /// How many times `run` was called.
    pub fn runs(&self) -> usize {
        self.runs.get()
    }
}

impl Scaffolder for MockScaffolder {
    fn run(&self) -> Result<()> {
        self.runs.set(self.runs.get() + 1);
        if self.fail {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only project",
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_failure_surfaces_from_factory() {
        let factory = MockRunnerFactory::new("remote", MockOutcome::ConnectionRefused);
        let result = factory.connect(&ConfigurationOptions::default());
        assert!(matches!(result, Err(DrillError::DrbConnection { .. })));
        assert_eq!(factory.calls(), 1);
    }

    #[test]
    fn run_failure_surfaces_from_run() {
        let factory = MockRunnerFactory::new("remote", MockOutcome::ConnectionRefused)
            .failing_at(FailurePoint::Run);
        let mut run = factory.connect(&ConfigurationOptions::default()).unwrap();

        let mut out = Vec::new();
        let result = run.run(&mut Vec::new(), &mut out);
        assert!(matches!(result, Err(DrillError::DrbConnection { .. })));
        assert_eq!(String::from_utf8(out).unwrap(), "remote out\n");
    }

    #[test]
    fn coordinator_records_calls() {
        let coordinator = MockCoordinator::new(true);
        let ok = coordinator
            .bisect_with(
                &["tests/a.rs".to_string()],
                &TestConfiguration::default(),
                BisectFormatter::DebugProgress,
            )
            .unwrap();
        assert!(ok);
        let calls = coordinator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].formatter, BisectFormatter::DebugProgress);
    }

    #[test]
    fn scaffolder_counts_runs() {
        let scaffolder = MockScaffolder::failing();
        assert!(scaffolder.run().is_err());
        assert_eq!(scaffolder.runs(), 1);
    }
}
