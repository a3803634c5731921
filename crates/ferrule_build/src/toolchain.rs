//! Compiling generated sources into extension modules.

use std::path::{Path, PathBuf};
use std::process::Command;

use indexmap::IndexMap;

use crate::error::ProcessFailure;

/// Everything the toolchain needs to build one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// The module name; the artifact is `<name><ext_suffix>`.
    pub module: String,
    /// Directory the toolchain runs in and writes the artifact to.
    pub working_dir: PathBuf,
    /// Source files to compile.
    pub sources: Vec<PathBuf>,
    /// Where to write the toolchain's combined output.
    pub log: PathBuf,
    /// Macro definitions; `None` defines the name without a value.
    pub macros: IndexMap<String, Option<String>>,
    /// Include directories, in search order.
    pub include_dirs: Vec<PathBuf>,
    /// Extra compiler arguments.
    pub compile_args: Vec<String>,
    /// Extra linker arguments.
    pub link_args: Vec<String>,
    /// C++ standard, e.g. `20`.
    pub cxx_std: u32,
}

/// Turns a compile request into a loadable artifact.
pub trait Toolchain: Send + Sync {
    /// Compiles and links the request, returning the artifact path.
    ///
    /// Blocks until the toolchain exits. No timeout is applied.
    fn compile(&self, request: &CompileRequest) -> Result<PathBuf, ProcessFailure>;
}

/// A toolchain that runs a C++ compiler driver such as `c++` or `clang++`.
#[derive(Debug, Clone)]
pub struct CommandToolchain {
    compiler: String,
    ext_suffix: String,
}

impl CommandToolchain {
    /// Creates a toolchain running `compiler`, producing `<module><ext_suffix>`.
    pub fn new(compiler: impl Into<String>, ext_suffix: impl Into<String>) -> Self {
        Self {
            compiler: compiler.into(),
            ext_suffix: ext_suffix.into(),
        }
    }

    /// The artifact a request produces.
    pub fn artifact(&self, request: &CompileRequest) -> PathBuf {
        request
            .working_dir
            .join(format!("{}{}", request.module, self.ext_suffix))
    }

    /// The compiler arguments for a request.
    pub fn args(&self, request: &CompileRequest) -> Vec<String> {
        let mut args = vec![
            "-shared".to_string(),
            "-fPIC".to_string(),
            format!("-std=c++{}", request.cxx_std),
        ];
        args.extend(request.compile_args.iter().cloned());
        for (name, value) in &request.macros {
            match value {
                Some(value) => args.push(format!("-D{name}={value}")),
                None => args.push(format!("-D{name}")),
            }
        }
        for dir in &request.include_dirs {
            args.push(format!("-I{}", dir.display()));
        }
        args.extend(request.sources.iter().map(|s| s.display().to_string()));
        args.push("-o".to_string());
        args.push(self.artifact(request).display().to_string());
        if cfg!(target_os = "macos") {
            args.push("-undefined".to_string());
            args.push("dynamic_lookup".to_string());
        }
        args.extend(request.link_args.iter().cloned());
        args
    }
}

impl Toolchain for CommandToolchain {
    fn compile(&self, request: &CompileRequest) -> Result<PathBuf, ProcessFailure> {
        let args = self.args(request);
        log::debug!("{} {}", self.compiler, args.join(" "));

        let output = Command::new(&self.compiler)
            .args(&args)
            .current_dir(&request.working_dir)
            .output()
            .map_err(|e| ProcessFailure::spawn(&self.compiler, &e))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        write_log(&request.log, &self.compiler, &args, &combined);

        if !output.status.success() {
            return Err(ProcessFailure {
                program: self.compiler.clone(),
                exit_code: output.status.code(),
                output: combined,
            });
        }
        Ok(self.artifact(request))
    }
}

/// Writes the command line and its output. The log is informational, so a
/// failed write is only reported.
fn write_log(path: &Path, program: &str, args: &[String], output: &str) {
    let contents = format!("$ {program} {}\n{output}", args.join(" "));
    if let Err(e) = std::fs::write(path, contents) {
        log::warn!("failed to write {}: {e}", path.display());
    }
}
