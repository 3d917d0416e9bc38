//! DRb test server client.
//!
//! A DRb server is a long-lived process that keeps the test environment
//! loaded and runs suites on request. The client speaks newline-delimited
//! JSON over TCP:
//!
//! ```text
//! -> {"argv":["tests/widget.rs"]}
//! <- {"stream":"out","text":"running 3 tests\n"}
//! <- {"stream":"err","text":"warning: ...\n"}
//! <- {"exit_code":0}
//! ```

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpStream};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::{ConfigurationOptions, OptionValue};
use crate::config::TestConfiguration;
use crate::error::{DrillError, Result};

use super::{RemoteRunnerFactory, TestRun};

/// How long to wait for the server to accept the connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Request sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrbRequest {
    /// Arguments for the remote run.
    pub argv: Vec<String>,
}

/// Which stream a chunk of server output belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Out,
    Err,
}

/// One line of server response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DrbMessage {
    /// Output produced by the remote run.
    Output { stream: StreamKind, text: String },
    /// Final message: the remote run's exit code.
    Exit { exit_code: i32 },
}

/// Arguments forwarded to the server.
///
/// The DRb flags themselves are dropped so the server runs the suite
/// in-process instead of trying to reach another server.
pub fn drb_argv(args: &[String]) -> Vec<String> {
    let mut argv = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--drb" | "-X" => {}
            "--drb-port" => {
                iter.next();
            }
            other if other.starts_with("--drb-port=") => {}
            _ => argv.push(arg.clone()),
        }
    }
    argv
}

/// Connection failures that mean "nobody is listening".
fn is_unreachable(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::AddrNotAvailable
            | io::ErrorKind::TimedOut
            | io::ErrorKind::BrokenPipe
    )
}

fn connection_error(address: SocketAddr, err: io::Error) -> DrillError {
    if is_unreachable(err.kind()) {
        DrillError::DrbConnection {
            address: address.to_string(),
            message: err.to_string(),
        }
    } else {
        DrillError::Io(err)
    }
}

/// Connects to the DRb server on localhost.
#[derive(Debug, Clone)]
pub struct DrbRunnerFactory {
    default_port: u16,
    timeout: Duration,
}

impl DrbRunnerFactory {
    /// Create a factory using the configured DRb port.
    pub fn new(configuration: &TestConfiguration) -> Self {
        Self {
            default_port: configuration.drb_port,
            timeout: CONNECT_TIMEOUT,
        }
    }

    /// Override the connect timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The port to connect to: `--drb-port` wins over configuration.
    pub fn port_for(&self, options: &ConfigurationOptions) -> Result<u16> {
        match options.get("drb_port") {
            None => Ok(self.default_port),
            Some(OptionValue::Number(n)) => {
                u16::try_from(*n).map_err(|_| DrillError::ConfigValidationError {
                    message: format!("DRb port out of range: {n}"),
                })
            }
            Some(other) => Err(DrillError::ConfigValidationError {
                message: format!("DRb port must be a number, got '{other}'"),
            }),
        }
    }
}

impl RemoteRunnerFactory for DrbRunnerFactory {
    fn connect(&self, options: &ConfigurationOptions) -> Result<Box<dyn TestRun>> {
        let port = self.port_for(options)?;
        let address = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port));
        tracing::debug!("Connecting to DRb server at {}", address);

        let stream = TcpStream::connect_timeout(&address, self.timeout)
            .map_err(|e| connection_error(address, e))?;

        Ok(Box::new(DrbClient {
            stream,
            address,
            argv: drb_argv(options.args()),
        }))
    }
}

/// A connected DRb client.
#[derive(Debug)]
pub struct DrbClient {
    stream: TcpStream,
    address: SocketAddr,
    argv: Vec<String>,
}

impl DrbClient {
    /// The arguments this client will send.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    fn send_request(&mut self) -> Result<()> {
        let request = DrbRequest {
            argv: self.argv.clone(),
        };
        let mut line = serde_json::to_vec(&request).map_err(anyhow::Error::from)?;
        line.push(b'\n');

        let address = self.address;
        self.stream
            .write_all(&line)
            .and_then(|()| self.stream.flush())
            .map_err(|e| connection_error(address, e))
    }
}

impl TestRun for DrbClient {
    fn run(&mut self, err: &mut dyn Write, out: &mut dyn Write) -> Result<i32> {
        self.send_request()?;

        let reader = BufReader::new(self.stream.try_clone()?);
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let message: DrbMessage =
                serde_json::from_str(&line).map_err(|e| DrillError::DrbProtocol {
                    message: format!("{e}: {line}"),
                })?;
            match message {
                DrbMessage::Output {
                    stream: StreamKind::Out,
                    text,
                } => out.write_all(text.as_bytes())?,
                DrbMessage::Output {
                    stream: StreamKind::Err,
                    text,
                } => err.write_all(text.as_bytes())?,
                DrbMessage::Exit { exit_code } => {
                    tracing::debug!("DRb run finished with exit code {}", exit_code);
                    return Ok(exit_code);
                }
            }
        }

        Err(DrillError::DrbProtocol {
            message: "connection closed before the exit code was sent".to_string(),
        })
    }
}
