//! Error types for building and loading modules.

use std::path::PathBuf;

/// An external process that ran and failed, or could not be started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{program} {}: {output}", exit_description(.exit_code))]
pub struct ProcessFailure {
    /// The program that was run.
    pub program: String,
    /// Exit code, or `None` if the process could not be started or was killed.
    pub exit_code: Option<i32>,
    /// Captured stdout and stderr, or the spawn error.
    pub output: String,
}

impl ProcessFailure {
    /// A process that could not be started at all.
    pub fn spawn(program: impl Into<String>, error: &std::io::Error) -> Self {
        Self {
            program: program.into(),
            exit_code: None,
            output: error.to_string(),
        }
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {code}"),
        None => "did not run to completion".to_string(),
    }
}

/// Errors that abort a single request for a module.
///
/// A failed request is not remembered: the next request for the same module
/// checks and builds again.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The toolchain rejected the generated source.
    #[error("compilation of module {module} failed:\n{diagnostics}")]
    Compilation {
        /// The module being built.
        module: String,
        /// Raw toolchain output.
        diagnostics: String,
    },

    /// Writing the module's working files failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The built module could not be loaded.
    #[error("failed to load module {module}: {reason}")]
    Load {
        /// The module import path.
        module: String,
        /// Why loading failed.
        reason: String,
    },

    /// No function has been registered for the module.
    #[error("no functions registered for module {module}")]
    UnknownModule {
        /// The requested module name.
        module: String,
    },

    /// The loaded module does not export the requested function, usually
    /// because it was registered after the module was loaded.
    #[error("module {module} does not export {symbol}")]
    MissingSymbol {
        /// The module import path.
        module: String,
        /// The exported symbol that was looked up.
        symbol: String,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| BuildError::Io { path, source }
    }
}
