//! Error types for signature translation and function registration.

use ferrule_types::TypeError;

/// Errors that abort the registration of a single function.
///
/// None of these leave partial state behind: a function that fails to
/// translate is never added to its module.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// One or more parameters, or the return, carry no annotation.
    #[error("function {function} has missing annotations: {}", .missing.join(", "))]
    MissingAnnotation {
        /// The function being registered.
        function: String,
        /// Positions lacking annotations, in order; `(return)` names the return.
        missing: Vec<String>,
    },

    /// A parameter or return annotation failed to translate.
    #[error("function {function}, {position}: {source}")]
    Type {
        /// The function being registered.
        function: String,
        /// The parameter name, or `(return)`.
        position: String,
        /// The underlying translation error.
        source: TypeError,
    },

    /// The signature text could not be parsed.
    #[error("malformed signature '{text}': {reason}")]
    MalformedSignature {
        /// The offending signature text.
        text: String,
        /// What was wrong with it.
        reason: String,
    },
}
