//! On-disk layout of a module's working directory.

use std::path::{Path, PathBuf};

/// Name of the generated source file inside a module's working directory.
pub const SOURCE_FILE: &str = "module.cpp";

/// Name of the toolchain log inside a module's working directory.
pub const BUILD_LOG: &str = "build.log";

/// Paths belonging to one module.
///
/// Module `name` lives in `<root>/<name>_ext/`, next to its source and build
/// log, and is imported as `<name>_ext.<name>` with `<root>` on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLayout {
    /// The module name.
    pub name: String,
    /// The module's working directory.
    pub dir: PathBuf,
    /// The generated source file.
    pub source: PathBuf,
    /// The toolchain log.
    pub log: PathBuf,
    /// The built extension module.
    pub artifact: PathBuf,
    /// Dotted import path of the built module.
    pub import_path: String,
}

impl ModuleLayout {
    /// Computes the layout of `name` under `root`.
    pub fn new(root: &Path, name: &str, ext_suffix: &str) -> Self {
        let ext_name = format!("{name}_ext");
        let dir = root.join(&ext_name);
        Self {
            name: name.to_string(),
            source: dir.join(SOURCE_FILE),
            log: dir.join(BUILD_LOG),
            artifact: dir.join(format!("{name}{ext_suffix}")),
            import_path: format!("{ext_name}.{name}"),
            dir,
        }
    }
}
