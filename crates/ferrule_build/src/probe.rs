//! Inspecting and loading built modules.
//!
//! Checksums are read out-of-process: a long-lived interpreter caches the
//! modules it has imported and would keep reporting the old checksum after a
//! rebuild.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ProcessFailure;

/// Reads an attribute of a built module without importing it into this process.
pub trait IsolatedCheck: Send + Sync {
    /// Returns the attribute's value, or `None` if the module or attribute
    /// does not exist. `Err` means the check itself could not run.
    fn check_attribute(
        &self,
        module_path: &str,
        attribute: &str,
    ) -> Result<Option<String>, ProcessFailure>;
}

/// Runs `python -c "import <module> as m; print(m.<attribute>)"` with the
/// module root prepended to `PYTHONPATH`.
#[derive(Debug, Clone)]
pub struct PythonCheck {
    python: String,
    search_root: PathBuf,
}

impl PythonCheck {
    /// Creates a check running `python` with `search_root` on the import path.
    pub fn new(python: impl Into<String>, search_root: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            search_root: search_root.into(),
        }
    }

    /// The inline script printing the attribute.
    pub fn script(module_path: &str, attribute: &str) -> String {
        format!("import {module_path} as m; print(m.{attribute})")
    }

    fn python_path(&self) -> OsString {
        let mut paths = vec![self.search_root.clone()];
        if let Some(existing) = std::env::var_os("PYTHONPATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        std::env::join_paths(paths).unwrap_or_else(|_| self.search_root.clone().into_os_string())
    }
}

impl IsolatedCheck for PythonCheck {
    fn check_attribute(
        &self,
        module_path: &str,
        attribute: &str,
    ) -> Result<Option<String>, ProcessFailure> {
        let output = Command::new(&self.python)
            .arg("-c")
            .arg(Self::script(module_path, attribute))
            .env("PYTHONPATH", self.python_path())
            .output()
            .map_err(|e| ProcessFailure::spawn(&self.python, &e))?;

        if !output.status.success() {
            log::debug!(
                "{module_path}.{attribute} unavailable: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(value))
    }
}

/// Makes a built module available to callers.
pub trait ModuleLoader: Send + Sync {
    /// Loads the module at `import_path`, built as `artifact`.
    fn load(&self, import_path: &str, artifact: &Path) -> Result<(), String>;

    /// Forgets cached import lookups so freshly built artifacts are found.
    /// Called once after every successful rebuild.
    fn invalidate_cache(&self);
}

/// A loader that requires the artifact to exist on disk.
///
/// Invocation of compiled functions happens in the host interpreter, so
/// this loader only confirms the artifact is in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactLoader;

impl ModuleLoader for ArtifactLoader {
    fn load(&self, import_path: &str, artifact: &Path) -> Result<(), String> {
        if artifact.is_file() {
            log::debug!("{import_path} found at {}", artifact.display());
            Ok(())
        } else {
            Err(format!("artifact {} does not exist", artifact.display()))
        }
    }

    fn invalidate_cache(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_text() {
        assert_eq!(
            PythonCheck::script("demo_ext.demo", "__checksum__"),
            "import demo_ext.demo as m; print(m.__checksum__)"
        );
    }

    #[test]
    fn python_path_starts_with_root() {
        let check = PythonCheck::new("python3", "/tmp/ext");
        let joined = check.python_path();
        let first = std::env::split_paths(&joined).next().unwrap();
        assert_eq!(first, PathBuf::from("/tmp/ext"));
    }

    #[test]
    fn missing_interpreter_is_process_failure() {
        let check = PythonCheck::new("ferrule-no-such-python", "/tmp/ext");
        let err = check
            .check_attribute("demo_ext.demo", "__checksum__")
            .unwrap_err();
        assert_eq!(err.exit_code, None);
    }

    #[test]
    fn artifact_loader_requires_file() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("demo.so");
        assert!(ArtifactLoader.load("demo_ext.demo", &artifact).is_err());
        std::fs::write(&artifact, b"").unwrap();
        assert!(ArtifactLoader.load("demo_ext.demo", &artifact).is_ok());
    }
}
