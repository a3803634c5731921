//! Module assembly: accumulating functions and rendering a module source.

use std::fmt::Write as _;
use std::ops::Range;

use ferrule_common::ContentHash;
use indexmap::{IndexMap, IndexSet};

use crate::function::{FunctionOptions, FunctionSpec};
use crate::headers::group_headers;

/// C++ standard used when no function requests one.
pub const DEFAULT_CXX_STD: u32 = 20;

/// Stands in for the build hash while the hash is computed.
const CHECKSUM_PLACEHOLDER: &str = "__FERRULE_CHECKSUM__";

/// Name of the module attribute holding the build hash.
pub const CHECKSUM_ATTRIBUTE: &str = "__checksum__";

/// Everything needed to build one extension module.
///
/// Option sets keep first-seen order and ignore duplicates, so registering
/// the same option twice never changes the generated source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSpec {
    functions: Vec<FunctionSpec>,
    headers: IndexSet<String>,
    include_paths: IndexSet<String>,
    define_macros: IndexSet<String>,
    compile_args: IndexSet<String>,
    link_args: IndexSet<String>,
    cxx_std: Option<u32>,
    free_threaded: bool,
}

impl ModuleSpec {
    /// Creates an empty module.
    ///
    /// Free-threaded modules declare that they do not need the GIL.
    pub fn new(free_threaded: bool) -> Self {
        Self {
            free_threaded,
            ..Self::default()
        }
    }

    /// Adds a translated function and merges its options.
    ///
    /// The module keeps the highest C++ standard any function asks for.
    pub fn add_function(
        &mut self,
        function: FunctionSpec,
        headers: Vec<String>,
        options: &FunctionOptions,
    ) {
        self.headers.extend(headers);
        self.headers.extend(options.extra_includes.iter().cloned());
        self.include_paths
            .extend(options.include_paths.iter().cloned());
        self.define_macros
            .extend(options.define_macros.iter().cloned());
        self.compile_args.extend(options.effective_compile_args());
        self.link_args.extend(options.effective_link_args());
        if let Some(std) = options.cxx_std {
            self.cxx_std = Some(self.cxx_std.map_or(std, |current| current.max(std)));
        }
        self.functions.push(function);
    }

    /// Functions in registration order.
    pub fn functions(&self) -> &[FunctionSpec] {
        &self.functions
    }

    /// Returns `true` if no function has been added.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Finds a function by host name.
    pub fn function(&self, name: &str) -> Option<&FunctionSpec> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Headers requested by functions and options.
    pub fn headers(&self) -> &IndexSet<String> {
        &self.headers
    }

    /// Include search paths.
    pub fn include_paths(&self) -> &IndexSet<String> {
        &self.include_paths
    }

    /// Macro definitions as written, `NAME` or `NAME=value`.
    pub fn define_macros(&self) -> &IndexSet<String> {
        &self.define_macros
    }

    /// Extra compiler arguments.
    pub fn compile_args(&self) -> &IndexSet<String> {
        &self.compile_args
    }

    /// Extra linker arguments.
    pub fn link_args(&self) -> &IndexSet<String> {
        &self.link_args
    }

    /// The C++ standard to compile with.
    pub fn cxx_std(&self) -> u32 {
        self.cxx_std.unwrap_or(DEFAULT_CXX_STD)
    }

    /// Whether the module declares free-threading support.
    pub fn free_threaded(&self) -> bool {
        self.free_threaded
    }

    /// Macro definitions split into names and optional values.
    pub fn macros(&self) -> IndexMap<String, Option<String>> {
        parse_macros(&self.define_macros)
    }

    /// Renders the module source and its content hash.
    ///
    /// The hash covers the rendered text with a placeholder where the hash
    /// itself goes, so it depends only on the module's logical content.
    /// Build options are listed in a leading comment and are therefore part
    /// of the hash too.
    pub fn make_source(&self, name: &str) -> GeneratedSource {
        let mut text = String::new();

        let _ = writeln!(text, "// ferrule module {name}");
        let _ = writeln!(text, "// cxx_std: {}", self.cxx_std());
        for (label, values) in [
            ("define_macros", &self.define_macros),
            ("include_paths", &self.include_paths),
            ("compile_args", &self.compile_args),
            ("link_args", &self.link_args),
        ] {
            if !values.is_empty() {
                let joined: Vec<&str> = values.iter().map(String::as_str).collect();
                let _ = writeln!(text, "// {label}: {}", joined.join(" "));
            }
        }
        text.push('\n');

        text.push_str(&group_headers(&self.headers).render());
        text.push_str("\nnamespace py = pybind11;\n");

        for function in &self.functions {
            text.push('\n');
            for ns in &function.scope {
                let _ = writeln!(text, "namespace {ns} {{");
            }
            let _ = writeln!(text, "auto {} = {};", function.name, function.callable());
            for ns in function.scope.iter().rev() {
                let _ = writeln!(text, "}} // namespace {ns}");
            }
        }

        text.push('\n');
        if self.free_threaded {
            let _ = writeln!(text, "PYBIND11_MODULE({name}, m, py::mod_gil_not_used()) {{");
        } else {
            let _ = writeln!(text, "PYBIND11_MODULE({name}, m) {{");
        }
        let _ = write!(text, "  m.attr(\"{CHECKSUM_ATTRIBUTE}\") = \"");
        let start = text.len();
        text.push_str(CHECKSUM_PLACEHOLDER);
        let placeholder = start..text.len();
        text.push_str("\";\n");
        for function in &self.functions {
            let _ = writeln!(text, "  {}", function.binding());
        }
        text.push_str("}\n");

        let hash = ContentHash::from_text(&text);
        GeneratedSource {
            text,
            hash,
            placeholder,
        }
    }
}

/// Rendered module source awaiting its build hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    /// Source text with the placeholder in place.
    pub text: String,
    /// Hash of `text`.
    pub hash: ContentHash,
    placeholder: Range<usize>,
}

impl GeneratedSource {
    /// The hash in the hex form embedded in the module.
    pub fn hash_hex(&self) -> String {
        self.hash.to_string()
    }

    /// The source to write to disk, with the hash in place of the placeholder.
    ///
    /// Only the placeholder emitted by the assembler is replaced; identical
    /// text inside function bodies is left alone.
    pub fn stamped(&self) -> String {
        let mut stamped = self.text.clone();
        stamped.replace_range(self.placeholder.clone(), &self.hash_hex());
        stamped
    }
}

/// Splits `NAME` / `NAME=value` definitions into a map, keeping order.
///
/// Only the first `=` separates name and value; a later definition of the
/// same name replaces the earlier value.
pub fn parse_macros<I, S>(definitions: I) -> IndexMap<String, Option<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    definitions
        .into_iter()
        .map(|def| match def.as_ref().split_once('=') {
            Some((name, value)) => (name.trim().to_string(), Some(value.trim().to_string())),
            None => (def.as_ref().trim().to_string(), None),
        })
        .collect()
}
