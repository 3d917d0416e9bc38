//! Test configuration loading.
//!
//! - [`schema`] - The [`TestConfiguration`] type and its defaults
//! - [`loader`] - File discovery, parsing, env overrides and validation

pub mod loader;
pub mod schema;

pub use loader::{
    apply_env_overrides, config_path, find_project_root, load_config, load_config_file,
    parse_config, validate, CONFIG_FILE_NAME, DRB_PORT_ENV,
};
pub use schema::{TestConfiguration, DEFAULT_DRB_PORT, DEFAULT_PATH};
