//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.
//!
//! clap's built-in `--help` and `--version` handling is disabled: both are
//! ordinary flags here so that printing help or the version is just another
//! invocation strategy chosen by the dispatcher.

use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

/// Flags the parser declares but rejects.
///
/// They still show up, without a description, in the rendered usage text,
/// which is why `--help` filters them back out.
pub const INVALID_OPTIONS: &[&str] = &["-d", "--I"];

/// Drill - Test runner front end.
#[derive(Debug, Parser)]
#[command(name = "drill")]
#[command(about, long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(override_usage = "drill [options] [files or directories]")]
pub struct Cli {
    /// Path to config file (overrides default .drill.yml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long)]
    pub project: Option<PathBuf>,

    /// Run examples via DRb
    #[arg(short = 'X', long)]
    pub drb: bool,

    /// Port to connect to the DRb server
    #[arg(long, value_name = "PORT")]
    pub drb_port: Option<u16>,

    /// Repeatedly run the suite to isolate the failures (--bisect=verbose for debug output)
    #[arg(
        long,
        value_name = "verbose",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub bisect: Option<String>,

    /// Initialize your project with drill
    #[arg(long)]
    pub init: bool,

    /// Display the version
    #[arg(short = 'v', long)]
    pub version: bool,

    /// You're looking at it
    #[arg(short, long)]
    pub help: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug_log: bool,

    #[arg(short = 'd', action = ArgAction::SetTrue)]
    pub debugger: bool,

    #[arg(long = "I", action = ArgAction::SetTrue)]
    pub include_dir: bool,

    /// Files or directories to run
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,
}

impl Cli {
    /// The first rejected flag present on the command line, if any.
    pub fn invalid_option(&self) -> Option<&'static str> {
        if self.debugger {
            Some(INVALID_OPTIONS[0])
        } else if self.include_dir {
            Some(INVALID_OPTIONS[1])
        } else {
            None
        }
    }
}

/// Render the full usage listing, invalid options included.
pub fn usage_text() -> String {
    let mut cmd = Cli::command();
    cmd.render_help().to_string()
}
