//! Policy engine API consumed by the field enforcer.

use crate::error::PolicyEngineError;

/// Policy decision point for field access.
///
/// The enforcer asks one question per field resolution: may `role` perform
/// `action` on `resource`? How policies are stored and matched (wildcards,
/// role hierarchies, policy files) is entirely up to the implementation.
///
/// Implementations are shared across all requests for the lifetime of a
/// server and are called concurrently from parallel field resolutions.
/// `enforce` must be synchronous, fast, and free of side effects observable
/// by the caller.
///
/// ```ignore
/// let allowed = engine.enforce("user", "project.members.name", "query")?;
/// ```
pub trait PolicyEngine: Send + Sync {
    /// Decide whether `role` may perform `action` on the dotted `resource` path.
    ///
    /// Returns `Ok(false)` for a denial. Denial is never an error.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the engine cannot answer (not loaded, unreachable)
    /// - `Internal` for unexpected failures
    fn enforce(&self, role: &str, resource: &str, action: &str) -> Result<bool, PolicyEngineError>;
}
