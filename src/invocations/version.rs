//! `drill --version`.

use std::io::Write;

use crate::cli::ConfigurationOptions;
use crate::error::Result;
use crate::version::DRILL_VERSION;

use super::{Invocation, EXIT_SUCCESS};

/// Prints the version string.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintVersion;

impl Invocation for PrintVersion {
    fn call(
        &self,
        _options: &ConfigurationOptions,
        _err: &mut dyn Write,
        out: &mut dyn Write,
    ) -> Result<i32> {
        writeln!(out, "{DRILL_VERSION}")?;
        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_version_with_newline() {
        let mut err = Vec::new();
        let mut out = Vec::new();

        let code = PrintVersion
            .call(&ConfigurationOptions::default(), &mut err, &mut out)
            .unwrap();

        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{DRILL_VERSION}\n"));
        assert!(err.is_empty());
    }

    #[test]
    fn repeated_calls_print_the_same_version() {
        let options = ConfigurationOptions::default();
        let mut outputs = Vec::new();
        for _ in 0..2 {
            let mut err = Vec::new();
            let mut out = Vec::new();
            let code = PrintVersion.call(&options, &mut err, &mut out).unwrap();
            outputs.push((code, err, out));
        }
        assert_eq!(outputs[0], outputs[1]);
    }
}
