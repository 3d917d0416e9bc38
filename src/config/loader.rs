//! Configuration file discovery and loading.
//!
//! The test configuration lives in `.drill.yml` at the project root. A
//! missing file is not an error: the defaults apply. The `DRILL_DRB_PORT`
//! environment variable overrides the configured DRb port.

use crate::config::schema::TestConfiguration;
use crate::error::{DrillError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the project configuration file.
pub const CONFIG_FILE_NAME: &str = ".drill.yml";

/// Environment variable overriding the DRb port.
pub const DRB_PORT_ENV: &str = "DRILL_DRB_PORT";

/// Path of the configuration file for the given project root.
pub fn config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}

/// Find the project root by walking up from `start`.
///
/// Looks for:
/// 1. `.drill.yml` (primary indicator)
/// 2. `.git` directory (fallback)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_FILE_NAME).is_file() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load a single config file and parse it into a [`TestConfiguration`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<TestConfiguration> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DrillError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DrillError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into a [`TestConfiguration`].
pub fn parse_config(content: &str, source_path: &Path) -> Result<TestConfiguration> {
    // An empty file deserializes as `null`, which means "all defaults".
    if content.trim().is_empty() {
        return Ok(TestConfiguration::default());
    }

    serde_yaml::from_str(content).map_err(|e| DrillError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Apply environment overrides using the given lookup.
pub fn apply_env_overrides<F>(config: &mut TestConfiguration, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(DRB_PORT_ENV) {
        let port = raw
            .trim()
            .parse::<u16>()
            .map_err(|_| DrillError::ConfigValidationError {
                message: format!("{DRB_PORT_ENV} must be a port number, got '{raw}'"),
            })?;
        tracing::debug!("DRb port overridden by {}: {}", DRB_PORT_ENV, port);
        config.drb_port = port;
    }
    Ok(())
}

/// Check values serde cannot reject on its own.
pub fn validate(config: &TestConfiguration) -> Result<()> {
    if config.test_command.is_empty() {
        return Err(DrillError::ConfigValidationError {
            message: "test_command must name a program".to_string(),
        });
    }
    if config.drb_port == 0 {
        return Err(DrillError::ConfigValidationError {
            message: "drb_port must be non-zero".to_string(),
        });
    }
    if let Some(bisect) = &config.bisect_command {
        if bisect.is_empty() {
            return Err(DrillError::ConfigValidationError {
                message: "bisect_command must name a program when set".to_string(),
            });
        }
    }
    Ok(())
}

/// Load the test configuration for a project.
///
/// If `config_override` is provided, that file must exist. Otherwise
/// `.drill.yml` under `project_root` is used when present.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<TestConfiguration> {
    let mut config = match config_override {
        Some(path) => load_config_file(path)?,
        None => {
            let path = config_path(project_root);
            if path.is_file() {
                load_config_file(&path)?
            } else {
                tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                TestConfiguration::default()
            }
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}
