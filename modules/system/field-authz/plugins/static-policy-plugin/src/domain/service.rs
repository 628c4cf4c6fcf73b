//! Service implementation for the static policy plugin.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::{PolicyMode, PolicyRule, StaticPolicyConfig};

/// Allow rules indexed `role -> resource -> actions`, so lookups borrow the
/// caller's strings.
#[derive(Debug, Default)]
struct RuleSet {
    by_role: HashMap<String, HashMap<String, HashSet<&'static str>>>,
    len: usize,
}

impl RuleSet {
    fn build<'r>(rules: impl IntoIterator<Item = &'r PolicyRule>) -> Self {
        let mut set = Self::default();
        for rule in rules {
            let inserted = set
                .by_role
                .entry(rule.role.clone())
                .or_default()
                .entry(rule.resource.clone())
                .or_default()
                .insert(rule.action.as_str());
            if inserted {
                set.len += 1;
            }
        }
        set
    }

    fn allows(&self, role: &str, resource: &str, action: &str) -> bool {
        self.by_role
            .get(role)
            .and_then(|resources| resources.get(resource))
            .is_some_and(|actions| actions.contains(action))
    }
}

/// Static policy engine.
///
/// Decides based on the configured mode:
/// - `rules`: allow iff `(role, resource, action)` is a configured rule
/// - `allow_all` / `deny_all`: constant decision
///
/// The rule set can be swapped at runtime with [`replace_rules`](Self::replace_rules);
/// reads never block.
pub struct StaticPolicyEngine {
    mode: PolicyMode,
    rules: ArcSwap<RuleSet>,
}

impl StaticPolicyEngine {
    /// Create an engine from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticPolicyConfig) -> Self {
        let rules = RuleSet::build(&cfg.rules);
        tracing::info!(mode = ?cfg.mode, rules = rules.len, "static policy loaded");
        if cfg.mode != PolicyMode::Rules && rules.len > 0 {
            tracing::warn!(mode = ?cfg.mode, "policy rules are ignored outside `rules` mode");
        }

        Self {
            mode: cfg.mode,
            rules: ArcSwap::from_pointee(rules),
        }
    }

    #[must_use]
    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    /// Number of distinct rules currently loaded.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.load().len
    }

    /// Whether `role` may perform `action` on `resource`.
    #[must_use]
    pub fn allows(&self, role: &str, resource: &str, action: &str) -> bool {
        match self.mode {
            PolicyMode::AllowAll => true,
            PolicyMode::DenyAll => false,
            PolicyMode::Rules => self.rules.load().allows(role, resource, action),
        }
    }

    /// Atomically replace the rule set.
    ///
    /// Decisions already in progress finish against the previous set.
    #[tracing::instrument(level = "debug", skip_all, fields(submitted = rules.len()))]
    pub fn replace_rules(&self, rules: &[PolicyRule]) {
        let rules = RuleSet::build(rules);
        tracing::info!(rules = rules.len, "static policy rules replaced");
        self.rules.store(Arc::new(rules));
    }
}

impl std::fmt::Debug for StaticPolicyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticPolicyEngine")
            .field("mode", &self.mode)
            .field("rule_count", &self.rule_count())
            .finish_non_exhaustive()
    }
}
