//! Print the usage listing without the rejected flags.

use std::io::Write;

use regex::Regex;

use crate::cli::ConfigurationOptions;
use crate::error::Result;

use super::{Invocation, EXIT_SUCCESS};

/// Remove the listing line of each hidden flag from `usage`.
///
/// A line is removed when, ignoring leading whitespace, it starts with one
/// of the flags followed by a comma, whitespace, or the end of the line.
/// Every other line is kept byte for byte, line endings included. Blank
/// flag tokens match nothing.
pub fn filter_help<S: AsRef<str>>(usage: &str, hidden: &[S]) -> Result<String> {
    let flags: Vec<&str> = hidden
        .iter()
        .map(|flag| flag.as_ref().trim())
        .filter(|flag| !flag.is_empty())
        .collect();
    if flags.is_empty() {
        return Ok(usage.to_string());
    }

    let alternatives = flags
        .iter()
        .map(|flag| regex::escape(flag))
        .collect::<Vec<_>>()
        .join("|");
    let declaration =
        Regex::new(&format!(r"^\s*(?:{alternatives})(?:,|\s|$)")).map_err(anyhow::Error::from)?;

    Ok(usage
        .split_inclusive('\n')
        .filter(|line| !declaration.is_match(line.trim_end_matches(['\n', '\r'])))
        .collect())
}

/// Prints the option parser's usage text with hidden flags filtered out.
#[derive(Debug, Clone)]
pub struct PrintHelp {
    usage: String,
    hidden_options: Vec<String>,
}

impl PrintHelp {
    /// Create the strategy from rendered usage text and the flags to hide.
    pub fn new(usage: String, hidden_options: Vec<String>) -> Self {
        Self {
            usage,
            hidden_options,
        }
    }
}

impl Invocation for PrintHelp {
    fn call(
        &self,
        _options: &ConfigurationOptions,
        _err: &mut dyn Write,
        out: &mut dyn Write,
    ) -> Result<i32> {
        let text = filter_help(&self.usage, &self.hidden_options)?;
        out.write_all(text.as_bytes())?;
        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USAGE: &str = "\
Usage: drill [options] [files or directories]

Options:
  -X, --drb            Run examples via DRb
  -d
      --I
  -h, --help           You're looking at it
      --debug-log      Enable debug logging (replaces the old -d flag)
";

    fn print(usage: &str, hidden: &[&str]) -> (i32, String) {
        let strategy = PrintHelp::new(
            usage.to_string(),
            hidden.iter().map(|s| s.to_string()).collect(),
        );
        let mut out = Vec::new();
        let code = strategy
            .call(&ConfigurationOptions::default(), &mut Vec::new(), &mut out)
            .unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn removes_bare_flag_lines() {
        let (code, out) = print(USAGE, &["-d", "--I"]);

        assert_eq!(code, 0);
        assert!(!out.lines().any(|l| l.trim() == "-d"));
        assert!(!out.lines().any(|l| l.trim() == "--I"));
        assert_eq!(out.lines().count(), USAGE.lines().count() - 2);
    }

    #[test]
    fn keeps_prose_mentions() {
        let (_, out) = print(USAGE, &["-d"]);
        assert!(out.contains("replaces the old -d flag"));
    }

    #[test]
    fn empty_hidden_list_is_identity() {
        let (code, out) = print(USAGE, &[]);
        assert_eq!(code, 0);
        assert_eq!(out, USAGE);
    }

    #[test]
    fn unknown_flag_is_noop() {
        let (_, out) = print(USAGE, &["--nope"]);
        assert_eq!(out, USAGE);
    }

    #[test]
    fn removes_declaration_with_long_form() {
        let out = filter_help("  -d, --debugger  Enable debugging\n  -v\n", &["-d"]).unwrap();
        assert_eq!(out, "  -v\n");
    }

    #[test]
    fn does_not_match_longer_flags() {
        let usage = "      --Include\n      --I\n";
        let out = filter_help(usage, &["--I"]).unwrap();
        assert_eq!(out, "      --Include\n");
    }

    #[test]
    fn preserves_whitespace_and_crlf() {
        let usage = "Options:\r\n  -d\r\n    trailing   \r\n";
        let out = filter_help(usage, &["-d"]).unwrap();
        assert_eq!(out, "Options:\r\n    trailing   \r\n");
    }

    #[test]
    fn handles_missing_final_newline() {
        let out = filter_help("  -v\n  -d", &["-d"]).unwrap();
        assert_eq!(out, "  -v\n");
    }

    #[test]
    fn blank_flags_are_ignored() {
        assert_eq!(filter_help(USAGE, &[""]).unwrap(), USAGE);
        assert_eq!(filter_help(USAGE, &["  "]).unwrap(), USAGE);

        let out = filter_help(USAGE, &["", "-d"]).unwrap();
        assert!(!out.lines().any(|l| l.trim() == "-d"));
        assert_eq!(out.lines().count(), USAGE.lines().count() - 1);
    }

    #[test]
    fn repeated_calls_print_the_same_listing() {
        let strategy = PrintHelp::new(USAGE.to_string(), vec!["-d".to_string()]);
        let options = ConfigurationOptions::default();

        let mut outputs = Vec::new();
        for _ in 0..2 {
            let mut err = Vec::new();
            let mut out = Vec::new();
            let code = strategy.call(&options, &mut err, &mut out).unwrap();
            outputs.push((code, err, out));
        }
        assert_eq!(outputs[0], outputs[1]);
        assert!(outputs[0].1.is_empty());
    }

    #[test]
    fn escapes_regex_metacharacters() {
        let out = filter_help("  -+\n  -a\n", &["-+"]).unwrap();
        assert_eq!(out, "  -a\n");
    }
}
