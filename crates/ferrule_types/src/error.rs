//! Error types for type parsing and translation.

/// Errors raised while parsing or translating a host type expression.
///
/// All variants carry the offending text so that a failed registration can
/// be traced back to the annotation that caused it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// The expression is not a well-formed type.
    #[error("malformed type '{expr}': {reason}")]
    MalformedType {
        /// The offending expression text.
        expr: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An `Annotated[...]` wrapper carries the wrong number or kind of extras.
    #[error("malformed annotation '{expr}': {reason}")]
    MalformedAnnotation {
        /// The offending annotation text.
        expr: String,
        /// What was wrong with it.
        reason: String,
    },

    /// No C++ mapping exists for the type and no override was supplied.
    #[error("no C++ type known for '{name}' and no override provided")]
    UnmappedType {
        /// The host type name that could not be mapped.
        name: String,
    },
}

impl TypeError {
    pub(crate) fn malformed_type(expr: impl Into<String>, reason: impl Into<String>) -> Self {
        TypeError::MalformedType {
            expr: expr.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_annotation(
        expr: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        TypeError::MalformedAnnotation {
            expr: expr.into(),
            reason: reason.into(),
        }
    }
}
