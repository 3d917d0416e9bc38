//! Parsed configuration options.
//!
//! [`ConfigurationOptions`] is what every invocation strategy receives: the
//! raw argument tokens plus a map of recognised options. It is built once by
//! the option parser and never mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cli::args::Cli;
use crate::error::{DrillError, Result};

/// Value of a single parsed option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// On/off switch.
    Bool(bool),
    /// Free-form text, e.g. `--bisect=verbose`.
    Text(String),
    /// Numeric value, e.g. `--drb-port`.
    Number(u64),
    /// Ordered list of values.
    List(Vec<String>),
}

impl OptionValue {
    /// Everything except `Bool(false)` counts as set.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Bool(false))
    }

    /// Get as text if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a number if this is a `Number` value.
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::List(v) => write!(f, "{}", v.join(",")),
        }
    }
}

/// Raw arguments plus the options parsed out of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationOptions {
    args: Vec<String>,
    options: BTreeMap<String, OptionValue>,
}

impl ConfigurationOptions {
    /// Create options from already-parsed parts.
    pub fn new(args: Vec<String>, options: BTreeMap<String, OptionValue>) -> Self {
        Self { args, options }
    }

    /// Build options from a parsed [`Cli`] and the tokens it was parsed from.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOption` if a declared-but-rejected flag was given.
    pub fn from_cli(cli: &Cli, args: Vec<String>) -> Result<Self> {
        if let Some(flag) = cli.invalid_option() {
            return Err(DrillError::InvalidOption {
                flag: flag.to_string(),
            });
        }

        let mut options = BTreeMap::new();
        let mut flag = |name: &str, on: bool| {
            if on {
                options.insert(name.to_string(), OptionValue::Bool(true));
            }
        };
        flag("help", cli.help);
        flag("version", cli.version);
        flag("init", cli.init);
        flag("drb", cli.drb);

        if let Some(bisect) = &cli.bisect {
            let value = if bisect == "true" {
                OptionValue::Bool(true)
            } else {
                OptionValue::Text(bisect.clone())
            };
            options.insert("bisect".to_string(), value);
        }
        if let Some(port) = cli.drb_port {
            options.insert("drb_port".to_string(), OptionValue::Number(u64::from(port)));
        }
        if let Some(config) = &cli.config {
            options.insert(
                "config".to_string(),
                OptionValue::Text(config.display().to_string()),
            );
        }
        if !cli.files.is_empty() {
            options.insert(
                "files_or_directories_to_run".to_string(),
                OptionValue::List(cli.files.clone()),
            );
        }

        Ok(Self { args, options })
    }

    /// Builder-style helper used mostly by tests.
    pub fn with_option(mut self, name: &str, value: OptionValue) -> Self {
        self.options.insert(name.to_string(), value);
        self
    }

    /// The raw argument tokens, program name excluded.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// All parsed options.
    pub fn options(&self) -> &BTreeMap<String, OptionValue> {
        &self.options
    }

    /// Look up a single option.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    /// Whether an option is present and truthy.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(OptionValue::is_truthy)
    }
}
