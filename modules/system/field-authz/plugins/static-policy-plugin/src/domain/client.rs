//! `PolicyEngine` implementation for the static policy plugin.

use field_authz_sdk::{PolicyEngine, PolicyEngineError};

use super::service::StaticPolicyEngine;

impl PolicyEngine for StaticPolicyEngine {
    fn enforce(&self, role: &str, resource: &str, action: &str) -> Result<bool, PolicyEngineError> {
        Ok(self.allows(role, resource, action))
    }
}
