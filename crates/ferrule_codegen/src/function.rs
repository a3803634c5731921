//! Function descriptors: what a stub provides, and what the assembler emits.

use std::collections::BTreeMap;
use std::fmt;

use ferrule_common::{platform_specific, Platform};
use ferrule_types::TargetType;

use crate::error::SignatureError;
use crate::signature::{translate_signature, HostSignature, ParameterSpec, TranslatedSignature};

/// Header required by vectorised functions.
pub const NUMPY_HEADER: &str = "<pybind11/numpy.h>";

/// pybind11 return value ownership policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReturnValuePolicy {
    /// Let pybind11 choose.
    #[default]
    Automatic,
    /// Like `Automatic`, but falls back to `Reference` for pointers.
    AutomaticReference,
    /// Python takes ownership of the returned object.
    TakeOwnership,
    /// Python receives a copy.
    Copy,
    /// Python receives a moved-from value.
    Move,
    /// C++ keeps ownership.
    Reference,
    /// C++ keeps ownership, tied to the lifetime of the parent object.
    ReferenceInternal,
}

impl ReturnValuePolicy {
    /// All policies, in declaration order.
    pub const ALL: [ReturnValuePolicy; 7] = [
        ReturnValuePolicy::Automatic,
        ReturnValuePolicy::AutomaticReference,
        ReturnValuePolicy::TakeOwnership,
        ReturnValuePolicy::Copy,
        ReturnValuePolicy::Move,
        ReturnValuePolicy::Reference,
        ReturnValuePolicy::ReferenceInternal,
    ];

    /// The pybind11 enumerator name, e.g. `reference_internal`.
    pub fn name(self) -> &'static str {
        match self {
            ReturnValuePolicy::Automatic => "automatic",
            ReturnValuePolicy::AutomaticReference => "automatic_reference",
            ReturnValuePolicy::TakeOwnership => "take_ownership",
            ReturnValuePolicy::Copy => "copy",
            ReturnValuePolicy::Move => "move",
            ReturnValuePolicy::Reference => "reference",
            ReturnValuePolicy::ReferenceInternal => "reference_internal",
        }
    }

    /// Parses a pybind11 enumerator name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// The C++ expression passed to `m.def`.
    pub fn cpp(self) -> String {
        format!("py::return_value_policy::{}", self.name())
    }
}

impl fmt::Display for ReturnValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A host function stub as written: name, signature, and embedded C++ body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    /// The function name.
    pub name: String,
    /// The parsed host signature.
    pub signature: HostSignature,
    /// C++ statements forming the function body.
    pub body: String,
    /// Enclosing namespaces, outermost first. Empty for free functions.
    pub scope: Vec<String>,
}

impl FunctionDef {
    /// Creates a free function.
    pub fn new(name: impl Into<String>, signature: HostSignature, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature,
            body: body.into(),
            scope: Vec::new(),
        }
    }

    /// Parses the signature text and creates a free function.
    pub fn parse(
        name: impl Into<String>,
        signature: &str,
        body: impl Into<String>,
    ) -> Result<Self, SignatureError> {
        Ok(Self::new(name, HostSignature::parse(signature)?, body))
    }

    /// Places the function inside the given namespaces.
    pub fn in_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }
}

/// Per-function compile and binding options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionOptions {
    /// Wrap the function in `py::vectorize`.
    pub vectorise: bool,
    /// Docstring attached to the binding.
    pub help: Option<String>,
    /// Ownership policy for the returned value.
    pub return_value_policy: ReturnValuePolicy,
    /// Additional headers, e.g. `"mylib.h"` or `<vector>`.
    pub extra_includes: Vec<String>,
    /// Additional include search paths.
    pub include_paths: Vec<String>,
    /// Macro definitions, `NAME` or `NAME=value`.
    pub define_macros: Vec<String>,
    /// Extra compiler arguments.
    pub compile_args: Vec<String>,
    /// Extra linker arguments.
    pub link_args: Vec<String>,
    /// Requested C++ standard, e.g. `20`.
    pub cxx_std: Option<u32>,
    /// Compiler arguments that only apply on one platform.
    pub platform_compile_args: BTreeMap<Platform, Vec<String>>,
    /// Linker arguments that only apply on one platform.
    pub platform_link_args: BTreeMap<Platform, Vec<String>>,
}

impl FunctionOptions {
    /// Compiler arguments for the running platform, common ones first.
    pub fn effective_compile_args(&self) -> Vec<String> {
        with_platform(&self.compile_args, &self.platform_compile_args)
    }

    /// Linker arguments for the running platform, common ones first.
    pub fn effective_link_args(&self) -> Vec<String> {
        with_platform(&self.link_args, &self.platform_link_args)
    }
}

fn with_platform(common: &[String], specific: &BTreeMap<Platform, Vec<String>>) -> Vec<String> {
    let mut args = common.to_vec();
    if let Some(extra) = platform_specific(specific) {
        args.extend(extra.iter().cloned());
    }
    args
}

/// A fully translated function, ready to be emitted into a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpec {
    /// The host function name.
    pub name: String,
    /// The pybind11 lambda header, e.g. `[](int a) -> int`.
    pub signature: String,
    /// C++ statements forming the function body.
    pub body: String,
    /// Translated parameters in source order.
    pub params: Vec<ParameterSpec>,
    /// Translated return type.
    pub returns: TargetType,
    /// pybind11 argument annotations in binding order.
    pub binding_annotations: Vec<String>,
    /// Enclosing namespaces, outermost first.
    pub scope: Vec<String>,
    /// Ownership policy; omitted from the binding when automatic.
    pub return_value_policy: ReturnValuePolicy,
    /// Docstring attached to the binding.
    pub help: Option<String>,
    /// Wrap the function in `py::vectorize`.
    pub vectorise: bool,
}

impl FunctionSpec {
    /// Translates a stub into a function spec.
    ///
    /// Returns the spec and the headers its types require (vectorised
    /// functions add the numpy header).
    pub fn translate(
        def: &FunctionDef,
        options: &FunctionOptions,
    ) -> Result<(Self, Vec<String>), SignatureError> {
        let TranslatedSignature {
            rendered,
            binding_annotations,
            mut headers,
            params,
            returns,
        } = translate_signature(&def.name, &def.signature)?;
        if options.vectorise {
            headers.push(NUMPY_HEADER.to_string());
        }

        let spec = Self {
            name: def.name.clone(),
            signature: rendered,
            body: def.body.clone(),
            params,
            returns,
            binding_annotations,
            scope: def.scope.clone(),
            return_value_policy: options.return_value_policy,
            help: options.help.clone(),
            vectorise: options.vectorise,
        };
        Ok((spec, headers))
    }

    /// The lambda expression bound to the function's variable.
    pub fn callable(&self) -> String {
        let lambda = format!("{} {{{}}}", self.signature, self.body);
        if self.vectorise {
            return format!("py::vectorize({lambda})");
        }
        lambda
    }

    /// The C++ path of the variable holding the function, e.g. `ns::f`.
    pub fn cpp_path(&self) -> String {
        let mut parts = self.scope.clone();
        parts.push(self.name.clone());
        parts.join("::")
    }

    /// The symbol the function is exported under, e.g. `_ns_f`.
    ///
    /// The leading underscore keeps the compiled function distinct from the
    /// host stub of the same name.
    pub fn qualified_name(&self) -> String {
        let mut symbol = String::new();
        for part in self.scope.iter().chain(std::iter::once(&self.name)) {
            symbol.push('_');
            symbol.push_str(part);
        }
        symbol
    }

    /// The `m.def(...)` statement registering this function.
    pub fn binding(&self) -> String {
        let mut args = vec![format!("\"{}\"", self.qualified_name()), self.cpp_path()];
        args.extend(self.binding_annotations.iter().cloned());
        if self.return_value_policy != ReturnValuePolicy::Automatic {
            args.push(self.return_value_policy.cpp());
        }
        if let Some(help) = &self.help {
            args.push(cpp_string_literal(help));
        }
        format!("m.def({});", args.join(", "))
    }
}

/// Quotes text as a C++ string literal.
pub(crate) fn cpp_string_literal(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
