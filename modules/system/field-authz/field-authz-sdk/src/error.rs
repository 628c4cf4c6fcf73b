//! Error types for the policy engine API.

use thiserror::Error;

/// Errors that can occur when asking a [`PolicyEngine`](crate::PolicyEngine) for a decision.
///
/// These represent infrastructure failures only.
/// Access denial is expressed via `enforce` returning `false`,
/// not as an error variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyEngineError {
    /// The engine cannot answer right now (policy set not loaded, backend unreachable).
    #[error("policy engine unavailable: {0}")]
    Unavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
