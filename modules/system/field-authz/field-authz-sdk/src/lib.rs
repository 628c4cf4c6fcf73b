#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Field `AuthZ` SDK
//!
//! This crate provides the engine-independent part of field-level GraphQL
//! authorization:
//!
//! - [`PolicyEngine`] - Decision API consumed by the enforcer
//! - [`PathNode`], [`resolve_path`] - Canonical dotted path of a field position
//! - [`RequestContext`], [`ExecutionContext`] - Request-scoped role and per-field position
//! - [`Role`], [`Operation`], [`Decision`] - Models
//! - [`pep`] - PEP helpers ([`FieldEnforcer`], [`EnforcerError`])
//!
//! ## Usage
//!
//! ```ignore
//! use field_authz_sdk::{ExecutionContext, FieldEnforcer, Operation, PathNode, RequestContext};
//!
//! // Create an enforcer (once, during init)
//! let enforcer = FieldEnforcer::new(policy_engine);
//!
//! // Per field: wrap the resolver
//! let project = PathNode::root("project");
//! let name = project.field("name");
//! let request = RequestContext::for_role("user");
//! let ctx = ExecutionContext::new(&request, &name, Operation::Query);
//!
//! let value = enforcer.resolve(
//!     |source, _ctx, _args| resolve_name(source),
//!     &project_row,
//!     &ctx,
//!     (),
//! )?;
//! ```

pub mod api;
pub mod context;
pub mod error;
pub mod models;
pub mod path;
pub mod pep;

// Re-export main types at crate root
pub use api::PolicyEngine;
pub use context::{ExecutionContext, RequestContext};
pub use error::PolicyEngineError;
pub use models::{ANONYMOUS_DISPLAY_NAME, ANONYMOUS_ROLE, Decision, Operation, Role};
pub use path::{PathKey, PathNode, resolve_path, resolve_path_from_leaf};
pub use pep::{EnforcerError, FieldEnforcer, PermissionInsufficient};
