//! Configuration for the static policy plugin.

use field_authz_sdk::Operation;
use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticPolicyConfig {
    /// Decision mode.
    pub mode: PolicyMode,

    /// Allow rules for `rules` mode.
    pub rules: Vec<PolicyRule>,
}

/// Decision mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Allow only the configured rules.
    #[default]
    Rules,
    /// Allow everything.
    AllowAll,
    /// Deny everything.
    DenyAll,
}

/// One allow rule. All three parts are matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyRule {
    /// Role the rule applies to; `"*"` targets anonymous requests.
    pub role: String,
    /// Canonical dotted field path.
    pub resource: String,
    pub action: Operation,
}

impl PolicyRule {
    #[must_use]
    pub fn new(role: impl Into<String>, resource: impl Into<String>, action: Operation) -> Self {
        Self {
            role: role.into(),
            resource: resource.into(),
            action,
        }
    }
}
