//! In-process test runs.
//!
//! The local runner executes the configured `test_command` as a child
//! process of `drill` and forwards its output into the caller's streams
//! line by line while it runs.

use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread;

use crate::cli::{ConfigurationOptions, OptionValue};
use crate::config::TestConfiguration;
use crate::error::{DrillError, Result};

use super::{LocalRunnerFactory, TestRun};

/// Builds [`ProcessRunner`]s from the test configuration.
#[derive(Debug, Clone)]
pub struct ProcessRunnerFactory {
    project_root: PathBuf,
    test_command: Vec<String>,
}

impl ProcessRunnerFactory {
    /// Create a factory running `configuration.test_command` in `project_root`.
    pub fn new(project_root: &Path, configuration: &TestConfiguration) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            test_command: configuration.test_command.clone(),
        }
    }
}

impl LocalRunnerFactory for ProcessRunnerFactory {
    fn build(&self, options: &ConfigurationOptions) -> Result<Box<dyn TestRun>> {
        let (program, base_args) =
            self.test_command
                .split_first()
                .ok_or_else(|| DrillError::ConfigValidationError {
                    message: "test_command must name a program".to_string(),
                })?;

        let mut args = base_args.to_vec();
        if let Some(OptionValue::List(files)) = options.get("files_or_directories_to_run") {
            args.extend(files.iter().cloned());
        }

        Ok(Box::new(ProcessRunner {
            program: program.clone(),
            args,
            cwd: self.project_root.clone(),
        }))
    }
}

/// Runs the test command as a child process.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
}

impl ProcessRunner {
    /// The full command line, for display.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A chunk of child output, tagged with the stream it came from.
enum OutputChunk {
    Stdout(Vec<u8>),
    Stderr(Vec<u8>),
}

/// Read `pipe` line by line on a new thread, sending each line (newline
/// included) as it arrives.
fn forward_lines<R>(
    pipe: R,
    tx: Sender<OutputChunk>,
    wrap: fn(Vec<u8>) -> OutputChunk,
) -> thread::JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        loop {
            let mut line = Vec::new();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if tx.send(wrap(line)).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

impl TestRun for ProcessRunner {
    fn run(&mut self, err: &mut dyn Write, out: &mut dyn Write) -> Result<i32> {
        tracing::debug!("Running locally: {}", self.command_line());

        let spawn_failed = |e: std::io::Error| {
            tracing::debug!("Failed to start {}: {}", self.program, e);
            DrillError::CommandFailed {
                command: self.command_line(),
                code: None,
            }
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_failed)?;

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(DrillError::UnexpectedState {
                    message: format!("{} started without output pipes", self.program),
                });
            }
        };

        let (tx, rx) = mpsc::channel();
        let stdout_handle = forward_lines(stdout, tx.clone(), OutputChunk::Stdout);
        let stderr_handle = forward_lines(stderr, tx, OutputChunk::Stderr);

        // Ends once both reader threads have dropped their senders.
        let mut forwarded = Ok(());
        for chunk in rx {
            if forwarded.is_err() {
                continue;
            }
            forwarded = match chunk {
                OutputChunk::Stdout(bytes) => out.write_all(&bytes).and_then(|()| out.flush()),
                OutputChunk::Stderr(bytes) => err.write_all(&bytes).and_then(|()| err.flush()),
            };
        }

        let _ = stdout_handle.join();
        let _ = stderr_handle.join();

        let status = child.wait().map_err(|e| {
            tracing::debug!("Failed to wait for {}: {}", self.program, e);
            DrillError::CommandFailed {
                command: self.command_line(),
                code: None,
            }
        })?;
        forwarded?;

        // Killed by a signal: no code, report plain failure.
        Ok(status.code().unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn factory(temp: &TempDir, command: &[&str]) -> ProcessRunnerFactory {
        let configuration = TestConfiguration {
            test_command: command.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        ProcessRunnerFactory::new(temp.path(), &configuration)
    }

    #[test]
    fn empty_test_command_is_rejected() {
        let temp = TempDir::new().unwrap();
        let result = factory(&temp, &[]).build(&ConfigurationOptions::default());
        assert!(matches!(
            result,
            Err(DrillError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn missing_program_is_command_failed() {
        let temp = TempDir::new().unwrap();
        let mut run = factory(&temp, &["drill-definitely-not-installed"])
            .build(&ConfigurationOptions::default())
            .unwrap();
        let result = run.run(&mut Vec::new(), &mut Vec::new());
        assert!(matches!(
            result,
            Err(DrillError::CommandFailed { code: None, .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn copies_output_and_exit_code() {
        let temp = TempDir::new().unwrap();
        let mut run = factory(&temp, &["sh", "-c", "echo out; echo err >&2; exit 3"])
            .build(&ConfigurationOptions::default())
            .unwrap();

        let mut err = Vec::new();
        let mut out = Vec::new();
        let code = run.run(&mut err, &mut out).unwrap();

        assert_eq!(code, 3);
        assert_eq!(String::from_utf8(out).unwrap(), "out\n");
        assert_eq!(String::from_utf8(err).unwrap(), "err\n");
    }

    /// Records how long after creation the first byte arrived.
    struct TimedWriter {
        started: Instant,
        first_write: Option<Duration>,
        bytes: Vec<u8>,
    }

    impl TimedWriter {
        fn new() -> Self {
            Self {
                started: Instant::now(),
                first_write: None,
                bytes: Vec::new(),
            }
        }
    }

    impl Write for TimedWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.first_write.is_none() && !buf.is_empty() {
                self.first_write = Some(self.started.elapsed());
            }
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[cfg(unix)]
    #[test]
    fn output_reaches_caller_while_child_runs() {
        let temp = TempDir::new().unwrap();
        let mut run = factory(&temp, &["sh", "-c", "echo first; sleep 2; echo second"])
            .build(&ConfigurationOptions::default())
            .unwrap();

        let mut out = TimedWriter::new();
        let code = run.run(&mut Vec::new(), &mut out).unwrap();
        let total = out.started.elapsed();

        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out.bytes).unwrap(), "first\nsecond\n");
        let first_write = out.first_write.unwrap();
        assert!(total >= Duration::from_secs(2));
        assert!(
            first_write < Duration::from_secs(1),
            "first output arrived after {first_write:?}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn interleaves_streams_in_arrival_order() {
        let temp = TempDir::new().unwrap();
        let mut run = factory(
            &temp,
            &["sh", "-c", "echo one; sleep 0.2; echo two >&2; sleep 0.2; echo three"],
        )
        .build(&ConfigurationOptions::default())
        .unwrap();

        // Both streams share one buffer so the order is observable.
        let shared = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        struct Shared(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);
        impl Write for Shared {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.borrow_mut().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let code = run
            .run(&mut Shared(shared.clone()), &mut Shared(shared.clone()))
            .unwrap();

        assert_eq!(code, 0);
        assert_eq!(
            String::from_utf8(shared.borrow().clone()).unwrap(),
            "one\ntwo\nthree\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn appends_files_to_run() {
        let temp = TempDir::new().unwrap();
        let options = ConfigurationOptions::default().with_option(
            "files_or_directories_to_run",
            OptionValue::List(vec!["tests/a.rs".to_string()]),
        );
        let mut run = factory(&temp, &["echo", "running"]).build(&options).unwrap();

        let mut out = Vec::new();
        let code = run.run(&mut Vec::new(), &mut out).unwrap();

        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "running tests/a.rs\n");
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_project_root() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "here").unwrap();
        let mut run = factory(&temp, &["cat", "marker.txt"])
            .build(&ConfigurationOptions::default())
            .unwrap();

        let mut out = Vec::new();
        run.run(&mut Vec::new(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "here");
    }
}
