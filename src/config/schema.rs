//! Test configuration schema.
//!
//! [`TestConfiguration`] is the process-wide configuration the runners and
//! the bisection coordinator share. It is loaded once per invocation and
//! passed explicitly to whoever needs it.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default TCP port of the DRb test server.
pub const DEFAULT_DRB_PORT: u16 = 8989;

/// Default directory scanned for tests.
pub const DEFAULT_PATH: &str = "tests";

/// Process-wide test configuration (`.drill.yml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestConfiguration {
    /// Command (program followed by arguments) that runs the suite locally.
    pub test_command: Vec<String>,

    /// Port the DRb test server listens on.
    pub drb_port: u16,

    /// Command that performs the bisection search, if any.
    pub bisect_command: Option<Vec<String>>,

    /// Directory containing the tests.
    pub default_path: String,
}

impl Default for TestConfiguration {
    fn default() -> Self {
        Self {
            test_command: vec!["cargo".to_string(), "test".to_string()],
            drb_port: DEFAULT_DRB_PORT,
            bisect_command: None,
            default_path: DEFAULT_PATH.to_string(),
        }
    }
}

impl TestConfiguration {
    /// Render the configuration as the YAML written by `--init`.
    ///
    /// # Errors
    ///
    /// Returns `Other` if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self).map_err(anyhow::Error::from)?;
        Ok(yaml)
    }
}
