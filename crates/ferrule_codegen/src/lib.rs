//! C++ source generation for annotated host function stubs.
//!
//! Translates host signatures into pybind11 lambda signatures and binding
//! annotations ([`signature`]), describes each compiled function
//! ([`function`]), assembles functions into a module source with a stable
//! content hash ([`module`]), and keeps the process-wide table of modules
//! being assembled ([`registry`]).

#![warn(missing_docs)]

pub mod error;
pub mod function;
pub mod headers;
pub mod module;
pub mod registry;
pub mod signature;

pub use error::SignatureError;
pub use function::{FunctionDef, FunctionOptions, FunctionSpec, ReturnValuePolicy};
pub use headers::{group_headers, HeaderGroups, PYBIND11_ROOT_HEADER};
pub use module::{parse_macros, GeneratedSource, ModuleSpec, CHECKSUM_ATTRIBUTE, DEFAULT_CXX_STD};
pub use registry::{RegisteredFunction, Registry};
pub use signature::{
    split_top_level, translate_signature, HostParam, HostSignature, ParamKind, ParameterSpec,
    TranslatedSignature,
};
