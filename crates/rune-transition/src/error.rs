//! Error types for the transition engine.

use thiserror::Error;

use super::types::TransitionKey;

/// Result type for transition operations.
pub type Result<T> = std::result::Result<T, TransitionError>;

/// Errors raised while building transition inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// Two layout outputs in one snapshot share a transition key.
    #[error("duplicate transition key in layout snapshot: {0}")]
    DuplicateTransitionKey(TransitionKey),

    /// A layout output was given an empty transition key.
    #[error("layout output has an empty transition key")]
    EmptyTransitionKey,
}
