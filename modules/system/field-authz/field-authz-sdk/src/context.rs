use serde::{Deserialize, Serialize};

use crate::models::{ANONYMOUS_ROLE, Operation, Role};
use crate::path::PathNode;

/// `RequestContext` carries the request-scoped input of field authorization.
///
/// Built once per request by the hosting server, after authentication has
/// established the role. Read-only for the enforcer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Role of the requesting principal. `None` means anonymous.
    #[serde(default)]
    role: Option<Role>,
}

impl RequestContext {
    /// Context without a role.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_role(role: impl Into<Role>) -> Self {
        Self {
            role: Some(role.into()),
        }
    }

    /// Get the role, if one was established.
    #[must_use]
    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    /// Role passed to the policy engine: the established role or the anonymous sentinel.
    #[must_use]
    pub fn effective_role(&self) -> &str {
        self.role.as_ref().map_or(ANONYMOUS_ROLE, Role::as_str)
    }
}

/// Per-field view of the execution state handed to the enforcer.
///
/// Borrows the request context and the engine-owned position chain for the
/// duration of one field resolution.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionContext<'a> {
    request: &'a RequestContext,
    position: &'a PathNode<'a>,
    operation: Operation,
}

impl<'a> ExecutionContext<'a> {
    #[must_use]
    pub const fn new(
        request: &'a RequestContext,
        position: &'a PathNode<'a>,
        operation: Operation,
    ) -> Self {
        Self {
            request,
            position,
            operation,
        }
    }

    #[must_use]
    pub const fn request(&self) -> &'a RequestContext {
        self.request
    }

    #[must_use]
    pub fn role(&self) -> Option<&'a Role> {
        self.request.role()
    }

    /// Current field position.
    #[must_use]
    pub const fn position(&self) -> &'a PathNode<'a> {
        self.position
    }

    /// Top-level operation kind of the request.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }
}
