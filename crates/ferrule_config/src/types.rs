//! Configuration types deserialized from `ferrule.toml`.

use serde::Deserialize;
use std::path::PathBuf;

/// Formatter style that turns formatting off.
pub const NO_FORMAT: &str = "none";

/// Settings shared by every module built in the process.
///
/// All keys are optional; missing keys take the defaults listed on each field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FerruleConfig {
    /// Root of the per-module working directories. Default `./ext`.
    pub extmodule_root: PathBuf,
    /// Style passed to the formatter; `none` disables formatting. Default `file`.
    pub cpp_format: String,
    /// Force modules to hold the GIL even when free-threading is requested.
    pub disable_ft: bool,
    /// Build modules that declare free-threading support.
    pub free_threaded: bool,
    /// Interpreter used to read checksums of built modules. Default `python3`.
    pub python: String,
    /// C++ compiler driver. Default `c++`.
    pub compiler: String,
    /// Formatter executable. Default `clang-format`.
    pub formatter: String,
    /// Extra include directories for every build, searched after the
    /// interpreter's pybind11 and numpy directories.
    pub include_dirs: Vec<PathBuf>,
    /// Filename suffix of built modules. Default `.so`.
    pub ext_suffix: String,
}

impl Default for FerruleConfig {
    fn default() -> Self {
        Self {
            extmodule_root: PathBuf::from("./ext"),
            cpp_format: "file".to_string(),
            disable_ft: false,
            free_threaded: false,
            python: "python3".to_string(),
            compiler: "c++".to_string(),
            formatter: "clang-format".to_string(),
            include_dirs: Vec::new(),
            ext_suffix: ".so".to_string(),
        }
    }
}

impl FerruleConfig {
    /// Whether generated modules should declare free-threading support.
    pub fn free_threading(&self) -> bool {
        self.free_threaded && !self.disable_ft
    }

    /// The formatter style, or `None` when formatting is disabled.
    pub fn format_style(&self) -> Option<&str> {
        match self.cpp_format.trim() {
            "" | NO_FORMAT => None,
            style => Some(style),
        }
    }
}
