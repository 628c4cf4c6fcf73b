#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Field `AuthZ` for `async-graphql`
//!
//! Installs the [`FieldEnforcer`](field_authz_sdk::FieldEnforcer) into an
//! `async-graphql` schema as an extension, so that every field resolution is
//! checked against the policy engine before its resolver runs.
//!
//! - [`FieldAuthz`] - Extension factory, one per schema
//! - [`EffectiveRole`] - Role the request was authorized as, visible to resolvers
//! - [`FieldAuthzConfig`] - Behaviour switches, loadable from YAML and environment
//!
//! A denied nullable field resolves to `null` and adds one error per field
//! occurrence, carrying the full response path and the field's location in the
//! document. A denied non-null field is returned to the engine as a field
//! error.
//!
//! ## Usage
//!
//! ```ignore
//! use async_graphql::{EmptyMutation, EmptySubscription, Request, Schema};
//! use field_authz::{FieldAuthz, FieldAuthzConfig};
//! use field_authz_sdk::RequestContext;
//!
//! let schema = Schema::build(Query, EmptyMutation, EmptySubscription)
//!     .extension(FieldAuthz::new(policy_engine).with_config(FieldAuthzConfig::load(None)?))
//!     .finish();
//!
//! // After authentication
//! let request = Request::new(query).data(RequestContext::for_role("user"));
//! let response = schema.execute(request).await;
//! ```

pub mod config;
mod error;
mod extension;
mod operation;

pub use config::{ConfigError, FieldAuthzConfig, IntrospectionPolicy};
pub use extension::{EffectiveRole, FieldAuthz};
