//! Models shared by the enforcer, the engine integration, and policy engines.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pep::PermissionInsufficient;

/// Reserved role value meaning "no authenticated role present".
pub const ANONYMOUS_ROLE: &str = "*";

/// Name shown in denial messages in place of [`ANONYMOUS_ROLE`].
pub const ANONYMOUS_DISPLAY_NAME: &str = "anonymous";

/// Opaque identifier of the requesting principal.
///
/// Not validated or looked up anywhere in this crate; the policy engine
/// gives it meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    #[must_use]
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// The anonymous sentinel role.
    #[must_use]
    pub fn anonymous() -> Self {
        Self(ANONYMOUS_ROLE.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_ROLE
    }

    /// Name used in denial messages: `"anonymous"` for the sentinel, the role otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        display_name(&self.0)
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        Self::new(role)
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        Self(role)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn display_name(role: &str) -> &str {
    if role == ANONYMOUS_ROLE {
        ANONYMOUS_DISPLAY_NAME
    } else {
        role
    }
}

/// Top-level operation kind of a GraphQL request.
///
/// Constant for every field resolved within one request and passed to the
/// policy engine as the action, in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Query,
    Mutation,
    Subscription,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one field authorization.
///
/// The deny arm carries the ready-to-raise error so the caller's catch
/// boundary is a plain pattern match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(PermissionInsufficient),
}

impl Decision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Convert into a `Result`, turning denial into an error.
    ///
    /// # Errors
    ///
    /// Returns the [`PermissionInsufficient`] carried by [`Decision::Denied`].
    pub fn into_result(self) -> Result<(), PermissionInsufficient> {
        match self {
            Self::Allowed => Ok(()),
            Self::Denied(denied) => Err(denied),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn anonymous_role_displays_as_anonymous() {
        let role = Role::anonymous();
        assert!(role.is_anonymous());
        assert_eq!(role.as_str(), "*");
        assert_eq!(role.display_name(), "anonymous");
    }

    #[test]
    fn named_role_displays_verbatim() {
        let role = Role::from("user");
        assert!(!role.is_anonymous());
        assert_eq!(role.display_name(), "user");
        assert_eq!(role.to_string(), "user");
    }

    #[test]
    fn operation_is_lowercase() {
        assert_eq!(Operation::Query.to_string(), "query");
        assert_eq!(Operation::Mutation.as_str(), "mutation");
        assert_eq!(
            serde_json::to_value(Operation::Subscription).unwrap(),
            serde_json::json!("subscription")
        );
    }

    #[test]
    fn role_serializes_as_plain_string() {
        let role: Role = serde_json::from_value(serde_json::json!("admin")).unwrap();
        assert_eq!(role, Role::new("admin"));
        assert_eq!(serde_json::to_value(&role).unwrap(), serde_json::json!("admin"));
    }
}
