//! Drill CLI entry point.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use drill::cli::{usage_text, Cli, ConfigurationOptions, INVALID_OPTIONS};
use drill::config::{find_project_root, load_config, TestConfiguration};
use drill::invocations::{Collaborators, Invocation, InvocationDispatcher};
use drill::runner::{CommandCoordinator, DrbRunnerFactory, ProcessRunnerFactory, ProjectInitializer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug-log` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("drill=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("drill=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn project_root(cli: &Cli) -> drill::Result<PathBuf> {
    if let Some(project) = &cli.project {
        return Ok(project.clone());
    }
    let cwd = std::env::current_dir()?;
    Ok(find_project_root(&cwd).unwrap_or(cwd))
}

fn run(cli: &Cli, args: Vec<String>) -> drill::Result<i32> {
    let options = ConfigurationOptions::from_cli(cli, args)?;
    let project_root = project_root(cli)?;

    // Help and version must work even in a project with a broken config.
    let configuration = if options.is_set("help") || options.is_set("version") {
        TestConfiguration::default()
    } else {
        load_config(&project_root, cli.config.as_deref())?
    };

    let remote = DrbRunnerFactory::new(&configuration);
    let local = ProcessRunnerFactory::new(&project_root, &configuration);
    let coordinator = CommandCoordinator::new(&project_root);
    let scaffolder = ProjectInitializer::new(&project_root);

    let dispatcher = InvocationDispatcher::new(
        Collaborators {
            remote: &remote,
            local: &local,
            coordinator: &coordinator,
            scaffolder: &scaffolder,
            configuration: &configuration,
        },
        usage_text(),
        INVALID_OPTIONS,
    );
    let strategy = dispatcher.select(&options);

    let stderr = io::stderr();
    let stdout = io::stdout();
    strategy.call(&options, &mut stderr.lock(), &mut stdout.lock())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    init_tracing(cli.debug_log);

    tracing::debug!("Drill starting with args: {:?}", args);

    match run(&cli, args) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
