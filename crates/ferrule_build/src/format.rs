//! Best-effort formatting of generated sources.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::ProcessFailure;

/// Pretty-prints C++ source.
pub trait Formatter: Send + Sync {
    /// Formats `source` in the given style.
    fn format(&self, source: &str, style: &str) -> Result<String, ProcessFailure>;
}

/// Pipes source through `clang-format --style=<style>`.
#[derive(Debug, Clone)]
pub struct ClangFormat {
    executable: String,
}

impl ClangFormat {
    /// Creates a formatter running `executable`.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl Formatter for ClangFormat {
    fn format(&self, source: &str, style: &str) -> Result<String, ProcessFailure> {
        let spawn_failure = |e: std::io::Error| ProcessFailure::spawn(&self.executable, &e);

        let mut child = Command::new(&self.executable)
            .arg(format!("--style={style}"))
            .arg("--assume-filename=module.cpp")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_failure)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).map_err(spawn_failure)?;
        }
        let output = child.wait_with_output().map_err(spawn_failure)?;

        if !output.status.success() {
            return Err(ProcessFailure {
                program: self.executable.clone(),
                exit_code: output.status.code(),
                output: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Formats `source` when a style is given, falling back to the original text
/// with a warning if the formatter fails.
pub fn format_or_original(formatter: &dyn Formatter, source: String, style: Option<&str>) -> String {
    let Some(style) = style else {
        return source;
    };
    match formatter.format(&source, style) {
        Ok(formatted) => formatted,
        Err(e) => {
            log::warn!("formatting skipped: {e}");
            source
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl Formatter for Upper {
        fn format(&self, source: &str, _style: &str) -> Result<String, ProcessFailure> {
            Ok(source.to_uppercase())
        }
    }

    struct Broken;

    impl Formatter for Broken {
        fn format(&self, _source: &str, _style: &str) -> Result<String, ProcessFailure> {
            Err(ProcessFailure {
                program: "clang-format".to_string(),
                exit_code: Some(1),
                output: "invalid style".to_string(),
            })
        }
    }

    #[test]
    fn formats_with_style() {
        assert_eq!(format_or_original(&Upper, "int x;".to_string(), Some("file")), "INT X;");
    }

    #[test]
    fn no_style_leaves_source() {
        assert_eq!(format_or_original(&Upper, "int x;".to_string(), None), "int x;");
    }

    #[test]
    fn failure_keeps_original() {
        assert_eq!(format_or_original(&Broken, "int x;".to_string(), Some("file")), "int x;");
    }

    #[test]
    fn missing_executable_falls_back() {
        let formatter = ClangFormat::new("ferrule-no-such-formatter");
        assert!(formatter.format("int x;", "file").is_err());
        assert_eq!(
            format_or_original(&formatter, "int x;".to_string(), Some("file")),
            "int x;"
        );
    }
}
