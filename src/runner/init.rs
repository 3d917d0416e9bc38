//! Project scaffolding for `drill --init`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{TestConfiguration, CONFIG_FILE_NAME, DEFAULT_PATH};
use crate::error::Result;

use super::Scaffolder;

const HELPER_FILE_NAME: &str = "drill_helper.rs";

const HELPER_TEMPLATE: &str = "\
//! Shared setup for the test suite.
//!
//! Include it from a test file with `mod drill_helper;`.

#[allow(dead_code)]
pub fn fixture_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!(\"CARGO_MANIFEST_DIR\"))
        .join(\"tests\")
        .join(\"fixtures\")
        .join(name)
}
";

/// Writes `.drill.yml` and a test helper into a project.
#[derive(Debug, Clone)]
pub struct ProjectInitializer {
    project_root: PathBuf,
}

impl ProjectInitializer {
    /// Create an initializer for the given project root.
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Files to create, relative to the project root, with their content.
    fn files(&self) -> Result<Vec<(PathBuf, String)>> {
        let config = format!(
            "# Drill configuration\n\
             # test_command runs the suite; bisect_command performs --bisect searches.\n\
             {}",
            TestConfiguration::default().to_yaml()?
        );
        Ok(vec![
            (PathBuf::from(CONFIG_FILE_NAME), config),
            (
                Path::new(DEFAULT_PATH).join(HELPER_FILE_NAME),
                HELPER_TEMPLATE.to_string(),
            ),
        ])
    }

    /// Scaffold the project, reporting each file to `report`.
    ///
    /// Existing files are never overwritten.
    pub fn run_with(&self, report: &mut dyn Write) -> Result<()> {
        for (relative, content) in self.files()? {
            let path = self.project_root.join(&relative);
            if path.exists() {
                writeln!(report, "  exist   {}", relative.display())?;
                continue;
            }

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
            tracing::debug!("Created {}", path.display());
            writeln!(report, "  create   {}", relative.display())?;
        }
        Ok(())
    }
}

impl Scaffolder for ProjectInitializer {
    fn run(&self) -> Result<()> {
        self.run_with(&mut std::io::stdout())
    }
}
