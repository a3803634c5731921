//! Building and caching compiled extension modules.
//!
//! A [`BuildCache`] decides, once per module per process, whether a module
//! built by an earlier run can be reused. If it cannot, the cache writes the
//! generated source, runs the [`Toolchain`], and loads the result. External
//! processes sit behind the [`Toolchain`], [`IsolatedCheck`], [`ModuleLoader`]
//! and [`Formatter`] traits. [`Session`] ties a module [`Registry`] to a cache.
//!
//! [`Registry`]: ferrule_codegen::Registry

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod format;
pub mod includes;
pub mod layout;
pub mod probe;
pub mod session;
pub mod toolchain;

pub use cache::{BuildCache, LoadedModule, ModuleState};
pub use error::{BuildError, ProcessFailure};
pub use format::{format_or_original, ClangFormat, Formatter};
pub use includes::{parse_include_flags, IncludeResolver, PythonIncludes};
pub use layout::ModuleLayout;
pub use probe::{ArtifactLoader, IsolatedCheck, ModuleLoader, PythonCheck};
pub use session::{CompiledFunction, Session};
pub use toolchain::{CommandToolchain, CompileRequest, Toolchain};
