//! Host type expressions and their translation to C++ types.
//!
//! A host annotation such as `Annotated[dict[str, list[int]], ConstReference]`
//! is lexed and parsed into a [`TypeExpr`], split into its base expression and
//! optional [`Extra`], turned into a canonical [`TypeNode`] tree, and finally
//! mapped through the closed [`TargetKind`] table into a [`TargetType`] that
//! renders as C++ text and reports the headers it needs.

#![warn(missing_docs)]

pub mod annotation;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod qualifier;
pub mod target;
pub mod tree;

pub use annotation::{parse_annotation, Extra};
pub use error::TypeError;
pub use expr::{parse_expr, TypeExpr};
pub use qualifier::Qualifier;
pub use target::{translate, TargetKind, TargetType};
pub use tree::TypeNode;
