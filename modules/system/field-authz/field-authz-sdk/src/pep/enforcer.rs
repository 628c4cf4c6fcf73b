//! Field Policy Enforcement Point (`PEP`) object.
//!
//! [`FieldEnforcer`] encapsulates the per-field flow:
//! derive the canonical path → call the policy engine → run the wrapped
//! resolver or fail with [`PermissionInsufficient`].
//!
//! Constructed once during server initialisation with the policy engine and
//! shared by every field resolution of every request.

use std::sync::Arc;

use crate::api::PolicyEngine;
use crate::context::ExecutionContext;
use crate::error::PolicyEngineError;
use crate::models::{ANONYMOUS_ROLE, Decision, Operation, Role, display_name};
use crate::path::resolve_path;

/// The policy engine denied a field.
///
/// Displays as `"<role> can not <action> <path>"`, with the anonymous
/// sentinel shown as `anonymous`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{role} can not {action} {path}")]
pub struct PermissionInsufficient {
    role: String,
    action: Operation,
    path: String,
}

impl PermissionInsufficient {
    #[must_use]
    pub fn new(role: &str, action: Operation, path: impl Into<String>) -> Self {
        Self {
            role: display_name(role).to_owned(),
            action,
            path: path.into(),
        }
    }

    /// Role as shown in the message.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    #[must_use]
    pub fn action(&self) -> Operation {
        self.action
    }

    /// Canonical dotted path of the denied field.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Error from the field enforcement flow.
#[derive(Debug, thiserror::Error)]
pub enum EnforcerError {
    /// The policy engine denied access to the field.
    #[error(transparent)]
    PermissionInsufficient(#[from] PermissionInsufficient),

    /// The policy engine call failed. Propagated unchanged.
    #[error(transparent)]
    EvaluationFailed(#[from] PolicyEngineError),
}

/// Field Policy Enforcement Point.
///
/// Holds the policy engine. Cloneable and cheap to pass around (`Arc`
/// inside); holds no per-request state, so one instance serves concurrent
/// resolutions.
///
/// # Example
///
/// ```ignore
/// use field_authz_sdk::{ExecutionContext, FieldEnforcer, Operation, PathNode, RequestContext};
///
/// let enforcer = FieldEnforcer::new(engine);
///
/// let project = PathNode::root("project");
/// let request = RequestContext::for_role("user");
/// let ctx = ExecutionContext::new(&request, &project, Operation::Query);
///
/// let project = enforcer.resolve(load_project, &db, &ctx, ProjectArgs { id: 2 })?;
/// ```
#[derive(Clone)]
pub struct FieldEnforcer {
    engine: Arc<dyn PolicyEngine>,
}

impl FieldEnforcer {
    #[must_use]
    pub fn new(engine: Arc<dyn PolicyEngine>) -> Self {
        Self { engine }
    }

    // ── Low-level: decision only ─────────────────────────────────────

    /// Ask the policy engine about one `(role, path, operation)` triple.
    ///
    /// An absent role is sent as the anonymous sentinel.
    ///
    /// # Errors
    ///
    /// Returns the engine's [`PolicyEngineError`] unchanged if the call fails.
    pub fn decide(
        &self,
        role: Option<&Role>,
        path: &str,
        operation: Operation,
    ) -> Result<Decision, PolicyEngineError> {
        let role = role.map_or(ANONYMOUS_ROLE, Role::as_str);
        let action = operation.as_str();

        let allowed = self
            .engine
            .enforce(role, path, action)
            .inspect_err(|e| {
                tracing::error!(role, path, action, error = %e, "policy engine call failed");
            })?;

        if allowed {
            tracing::trace!(role, path, action, "field access allowed");
            Ok(Decision::Allowed)
        } else {
            tracing::debug!(role, path, action, "field access denied");
            Ok(Decision::Denied(PermissionInsufficient::new(
                role, operation, path,
            )))
        }
    }

    /// Like [`decide`](Self::decide), with denial turned into an error.
    ///
    /// # Errors
    ///
    /// - [`EnforcerError::PermissionInsufficient`] if the engine denies access
    /// - [`EnforcerError::EvaluationFailed`] if the engine call fails
    pub fn authorize(
        &self,
        role: Option<&Role>,
        path: &str,
        operation: Operation,
    ) -> Result<(), EnforcerError> {
        Ok(self.decide(role, path, operation)?.into_result()?)
    }

    /// Authorize the field at the context's current position.
    ///
    /// # Errors
    ///
    /// Same as [`authorize`](Self::authorize).
    pub fn authorize_field(&self, ctx: &ExecutionContext<'_>) -> Result<(), EnforcerError> {
        let path = resolve_path(ctx.position());
        self.authorize(ctx.role(), &path, ctx.operation())
    }

    // ── High-level: resolver interception ───────────────────────────

    /// Intercept one field resolution.
    ///
    /// Runs `next(source, ctx, args)` and returns its result untouched when
    /// the engine allows the field. On denial `next` is never called.
    ///
    /// # Errors
    ///
    /// - [`EnforcerError`] (converted into `E`) if the field is denied or the
    ///   engine call fails
    /// - whatever `next` returns
    pub fn resolve<S, A, T, E, N>(
        &self,
        next: N,
        source: S,
        ctx: &ExecutionContext<'_>,
        args: A,
    ) -> Result<T, E>
    where
        N: FnOnce(S, &ExecutionContext<'_>, A) -> Result<T, E>,
        E: From<EnforcerError>,
    {
        self.authorize_field(ctx)?;
        next(source, ctx, args)
    }
}

impl std::fmt::Debug for FieldEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldEnforcer").finish_non_exhaustive()
    }
}
