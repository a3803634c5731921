//! Stub manifests: TOML files listing host functions to compile.
//!
//! ```toml
//! module = "demo"
//!
//! [[function]]
//! name = "max"
//! signature = "(i: int, j: int) -> int"
//! body = "return i > j ? i : j;"
//! help = "Larger of two integers"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use ferrule_codegen::{FunctionDef, FunctionOptions, HostSignature, ReturnValuePolicy, SignatureError};
use ferrule_common::Platform;
use serde::Deserialize;

/// Errors reading a stub manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Io {
        /// The manifest path.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse manifest: {0}")]
    Parse(String),

    /// A function's signature could not be parsed.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// A function names an unknown return value policy.
    #[error("function {function}: unknown return_value_policy '{policy}'")]
    UnknownPolicy {
        /// The function declaring the policy.
        function: String,
        /// The policy as written.
        policy: String,
    },

    /// No module name was given and none could be derived.
    #[error("manifest has no module name")]
    NoModuleName,
}

/// A parsed stub manifest.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StubManifest {
    /// Module name; defaults to the manifest's file stem.
    #[serde(default)]
    pub module: Option<String>,
    /// Functions in registration order.
    #[serde(default, rename = "function")]
    pub functions: Vec<StubFunction>,
}

/// One function entry of a manifest.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StubFunction {
    /// Function name.
    pub name: String,
    /// Signature text, e.g. `(a: int) -> int`.
    pub signature: String,
    /// C++ statements forming the body.
    pub body: String,
    /// Enclosing namespaces, outermost first.
    #[serde(default)]
    pub scope: Vec<String>,
    /// Docstring.
    #[serde(default)]
    pub help: Option<String>,
    /// pybind11 return value policy name.
    #[serde(default)]
    pub return_value_policy: Option<String>,
    /// Wrap in `py::vectorize`.
    #[serde(default)]
    pub vectorise: bool,
    /// Additional headers.
    #[serde(default)]
    pub extra_includes: Vec<String>,
    /// Additional include search paths.
    #[serde(default)]
    pub include_paths: Vec<String>,
    /// Macro definitions, `NAME` or `NAME=value`.
    #[serde(default)]
    pub define_macros: Vec<String>,
    /// Extra compiler arguments.
    #[serde(default)]
    pub compile_args: Vec<String>,
    /// Extra linker arguments.
    #[serde(default)]
    pub link_args: Vec<String>,
    /// Requested C++ standard.
    #[serde(default)]
    pub cxx_std: Option<u32>,
    /// Compiler arguments per platform.
    #[serde(default)]
    pub platform_compile_args: BTreeMap<Platform, Vec<String>>,
    /// Linker arguments per platform.
    #[serde(default)]
    pub platform_link_args: BTreeMap<Platform, Vec<String>>,
}

impl StubFunction {
    /// Converts the entry into a definition and options.
    pub fn to_def(&self) -> Result<(FunctionDef, FunctionOptions), ManifestError> {
        let signature = HostSignature::parse(&self.signature)?;
        let def = FunctionDef::new(&self.name, signature, &self.body).in_scope(&self.scope);

        let return_value_policy = match &self.return_value_policy {
            Some(name) => {
                ReturnValuePolicy::from_name(name).ok_or_else(|| ManifestError::UnknownPolicy {
                    function: self.name.clone(),
                    policy: name.clone(),
                })?
            }
            None => ReturnValuePolicy::default(),
        };

        let options = FunctionOptions {
            vectorise: self.vectorise,
            help: self.help.clone(),
            return_value_policy,
            extra_includes: self.extra_includes.clone(),
            include_paths: self.include_paths.clone(),
            define_macros: self.define_macros.clone(),
            compile_args: self.compile_args.clone(),
            link_args: self.link_args.clone(),
            cxx_std: self.cxx_std,
            platform_compile_args: self.platform_compile_args.clone(),
            platform_link_args: self.platform_link_args.clone(),
        };
        Ok((def, options))
    }
}

impl StubManifest {
    /// Parses manifest text.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        toml::from_str(content).map_err(|e| ManifestError::Parse(e.to_string()))
    }

    /// Reads and parses a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// The module name: an explicit override, the `module` key, or the file stem.
    pub fn module_name(&self, explicit: Option<&str>, path: &Path) -> Result<String, ManifestError> {
        explicit
            .map(str::to_string)
            .or_else(|| self.module.clone())
            .or_else(|| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .filter(|name| !name.is_empty())
            .ok_or(ManifestError::NoModuleName)
    }

    /// All functions converted to definitions and options.
    pub fn definitions(&self) -> Result<Vec<(FunctionDef, FunctionOptions)>, ManifestError> {
        self.functions.iter().map(StubFunction::to_def).collect()
    }
}
