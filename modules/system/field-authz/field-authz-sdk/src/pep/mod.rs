//! PEP (Policy Enforcement Point) helpers.
//!
//! - [`FieldEnforcer`] - field interceptor (derive path -> ask engine -> resolve or deny)
//! - [`PermissionInsufficient`] - denial raised for one field
//! - [`EnforcerError`] - everything the interceptor can fail with

pub mod enforcer;

pub use enforcer::{EnforcerError, FieldEnforcer, PermissionInsufficient};
