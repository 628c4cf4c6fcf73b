#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Field `AuthZ` Policy Plugin
//!
//! A [`PolicyEngine`](field_authz_sdk::PolicyEngine) backed by a table of
//! explicit allow rules, for development, tests and small deployments.
//!
//! ## Modes
//!
//! - **`rules`** (default): Allows exactly the configured
//!   `(role, resource, action)` triples; everything else is denied.
//!   No wildcards, no role hierarchy.
//!
//! - **`allow_all`**: Allows every field. Replaces "authorization disabled"
//!   setups that still want the enforcement path exercised.
//!
//! - **`deny_all`**: Denies every field.
//!
//! ## Configuration
//!
//! ```yaml
//! field_authz:
//!   policy:
//!     mode: rules
//!     rules:
//!       - { role: "*", resource: "project", action: query }
//!       - { role: "user", resource: "project.members.name", action: query }
//! ```

pub mod config;
pub mod domain;

pub use config::{PolicyMode, PolicyRule, StaticPolicyConfig};
pub use domain::StaticPolicyEngine;
