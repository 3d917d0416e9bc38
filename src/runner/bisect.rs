//! Bisection coordinator.
//!
//! The search itself is delegated to an external program named by
//! `bisect_command` in `.drill.yml`. Drill only hands it the arguments and
//! tells it which progress formatter to use.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::TestConfiguration;
use crate::error::{DrillError, Result};

use super::BisectCoordinator;

/// Environment variable carrying the formatter name to the coordinator.
pub const BISECT_FORMAT_ENV: &str = "DRILL_BISECT_FORMAT";

/// Progress formatter the coordinator reports through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BisectFormatter {
    /// Standard progress output.
    Progress,
    /// Debug-level progress output (`--bisect=verbose`).
    DebugProgress,
}

impl BisectFormatter {
    /// Name passed to the coordinator.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Progress => "progress",
            Self::DebugProgress => "debug",
        }
    }
}

/// Arguments for the coordinator: the `--bisect` flag itself is dropped so
/// the runs it spawns don't bisect again.
pub fn bisect_argv(args: &[String]) -> Vec<String> {
    args.iter()
        .filter(|arg| *arg != "--bisect" && !arg.starts_with("--bisect="))
        .cloned()
        .collect()
}

/// Runs the configured `bisect_command` as a child process.
#[derive(Debug, Clone)]
pub struct CommandCoordinator {
    project_root: PathBuf,
}

impl CommandCoordinator {
    /// Create a coordinator running in `project_root`.
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }
}

impl BisectCoordinator for CommandCoordinator {
    fn bisect_with(
        &self,
        args: &[String],
        configuration: &TestConfiguration,
        formatter: BisectFormatter,
    ) -> Result<bool> {
        let command = configuration
            .bisect_command
            .as_deref()
            .unwrap_or_default();
        let Some((program, base_args)) = command.split_first() else {
            return Err(DrillError::BisectUnavailable {
                message: "set bisect_command in .drill.yml".to_string(),
            });
        };

        tracing::debug!(
            "Bisecting with {} ({} formatter)",
            program,
            formatter.name()
        );

        let status = Command::new(program)
            .args(base_args)
            .args(bisect_argv(args))
            .env(BISECT_FORMAT_ENV, formatter.name())
            .current_dir(&self.project_root)
            .status()
            .map_err(|e| {
                tracing::debug!("Failed to start {}: {}", program, e);
                DrillError::CommandFailed {
                    command: command.join(" "),
                    code: None,
                }
            })?;

        Ok(status.success())
    }
}
