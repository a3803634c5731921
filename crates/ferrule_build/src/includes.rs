//! Locating the Python, pybind11 and numpy headers.

use std::path::PathBuf;
use std::process::Command;

use crate::error::ProcessFailure;

/// Finds include directories every generated module needs.
pub trait IncludeResolver {
    /// Returns the directories in search order.
    fn include_dirs(&self) -> Result<Vec<PathBuf>, ProcessFailure>;
}

/// Asks the configured interpreter for its pybind11 and numpy headers.
///
/// `python -m pybind11 --includes` reports the Python and pybind11
/// directories as `-I` flags; numpy's directory comes from
/// `numpy.get_include()`. Modules that never include numpy still build
/// without it, so a missing numpy only drops its directory.
#[derive(Debug, Clone)]
pub struct PythonIncludes {
    python: String,
}

impl PythonIncludes {
    /// Creates a resolver running `python`.
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, ProcessFailure> {
        let output = Command::new(&self.python)
            .args(args)
            .output()
            .map_err(|e| ProcessFailure::spawn(&self.python, &e))?;
        if !output.status.success() {
            return Err(ProcessFailure {
                program: self.python.clone(),
                exit_code: output.status.code(),
                output: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl IncludeResolver for PythonIncludes {
    fn include_dirs(&self) -> Result<Vec<PathBuf>, ProcessFailure> {
        let mut dirs = parse_include_flags(&self.run(&["-m", "pybind11", "--includes"])?);
        match self.run(&["-c", "import numpy; print(numpy.get_include())"]) {
            Ok(out) if !out.trim().is_empty() => dirs.push(PathBuf::from(out.trim())),
            Ok(_) => {}
            Err(e) => log::warn!("numpy include directory unavailable: {e}"),
        }
        Ok(dirs)
    }
}

/// Extracts the directories from `-I<dir>` flags, ignoring anything else.
pub fn parse_include_flags(flags: &str) -> Vec<PathBuf> {
    flags
        .split_whitespace()
        .filter_map(|flag| flag.strip_prefix("-I"))
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Resolves include directories, logging a failure instead of returning it.
///
/// Builds can still succeed when the headers are reachable some other way,
/// e.g. through `include_dirs` in the configuration.
pub fn resolve_or_warn(resolver: &dyn IncludeResolver) -> Vec<PathBuf> {
    match resolver.include_dirs() {
        Ok(dirs) => {
            log::debug!("resolved {} include directories", dirs.len());
            dirs
        }
        Err(e) => {
            log::warn!("could not locate pybind11 headers: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl IncludeResolver for Broken {
        fn include_dirs(&self) -> Result<Vec<PathBuf>, ProcessFailure> {
            Err(ProcessFailure {
                program: "python3".to_string(),
                exit_code: Some(1),
                output: "No module named pybind11".to_string(),
            })
        }
    }

    #[test]
    fn include_flags_parsed() {
        let dirs = parse_include_flags(
            "-I/usr/include/python3.12 -I/opt/venv/lib/python3.12/site-packages/pybind11/include\n",
        );
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/usr/include/python3.12"),
                PathBuf::from("/opt/venv/lib/python3.12/site-packages/pybind11/include"),
            ]
        );
    }

    #[test]
    fn non_include_flags_ignored() {
        assert!(parse_include_flags("-DNDEBUG -I -O2").is_empty());
    }

    #[test]
    fn failure_resolves_to_nothing() {
        assert!(resolve_or_warn(&Broken).is_empty());
    }

    #[test]
    fn missing_interpreter_is_process_failure() {
        let err = PythonIncludes::new("ferrule-no-such-python")
            .include_dirs()
            .unwrap_err();
        assert_eq!(err.exit_code, None);
    }
}
