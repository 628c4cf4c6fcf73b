//! Configuration for the field authorization extension.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Extension configuration.
///
/// Loaded by [`FieldAuthzConfig::load`] from, in increasing precedence:
/// built-in defaults, an optional YAML file, `FIELD_AUTHZ_*` environment
/// variables.
///
/// ```yaml
/// cache_decisions: true
/// publish_role: true
/// introspection: enforce
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldAuthzConfig {
    /// Remember decisions per request, keyed by path.
    ///
    /// Role and operation are fixed within a request, so list elements
    /// sharing a canonical path cost one policy engine call.
    pub cache_decisions: bool,

    /// Expose the role the request was authorized as to resolvers, as
    /// [`EffectiveRole`](crate::EffectiveRole) in the context data.
    pub publish_role: bool,

    /// How introspection fields (`__schema`, `__type` and below) are treated.
    pub introspection: IntrospectionPolicy,
}

impl Default for FieldAuthzConfig {
    fn default() -> Self {
        Self {
            cache_decisions: true,
            publish_role: true,
            introspection: IntrospectionPolicy::Enforce,
        }
    }
}

/// Handling of introspection fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntrospectionPolicy {
    /// Check introspection fields against the policy engine like any other field.
    #[default]
    Enforce,
    /// Let introspection fields through without a policy check.
    Allow,
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid field authz configuration: {0}")]
    Invalid(#[source] Box<figment::Error>),
}

impl FieldAuthzConfig {
    /// Prefix of the environment variables overriding file values,
    /// e.g. `FIELD_AUTHZ_CACHE_DECISIONS=false`.
    pub const ENV_PREFIX: &'static str = "FIELD_AUTHZ_";

    const KEYS: [&'static str; 3] = ["cache_decisions", "publish_role", "introspection"];

    /// Load the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotFound`] if `path` is given but does not exist
    /// - [`ConfigError::Invalid`] if a source cannot be parsed or holds unknown keys
    #[tracing::instrument(level = "debug")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }

        let config: Self = figment
            .merge(Env::prefixed(Self::ENV_PREFIX).only(&Self::KEYS))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))?;

        tracing::info!(
            cache_decisions = config.cache_decisions,
            publish_role = config.publish_role,
            introspection = ?config.introspection,
            "field authz configuration loaded"
        );
        Ok(config)
    }
}
