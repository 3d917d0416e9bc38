//! Command-line interface for Drill.
//!
//! This module is the option parser the invocation strategies depend on.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`options`] - [`ConfigurationOptions`], the parsed view every strategy receives

pub mod args;
pub mod options;

pub use args::{usage_text, Cli, INVALID_OPTIONS};
pub use options::{ConfigurationOptions, OptionValue};
