//! Domain layer for the static policy plugin.

mod client;
pub mod service;

pub use service::StaticPolicyEngine;
