//! Error types for Matchday domain types.

use thiserror::Error;

/// Errors raised while constructing domain types from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// An identifier was empty.
    #[error("{kind} must not be empty")]
    EmptyId {
        /// Which identifier kind was being parsed.
        kind: &'static str,
    },

    /// An identifier contained characters that cannot appear in a URL path segment.
    #[error("invalid {kind}: {value:?}")]
    InvalidId {
        /// Which identifier kind was being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}
