//! Hotfix workflows.
//!
//! Each workflow takes a fully-resolved [`crate::context::WorkflowContext`]
//! plus its typed options, runs a strictly-ordered step sequence against the
//! [`crate::git::Git`] and [`crate::gateway::Gateway`] seams, and returns a
//! serializable output record. Precondition failures abort before any
//! mutation, local or remote.

mod create;
mod deploy;

pub use create::{run_create, CreateOutput};
pub use deploy::{run_deploy, DeployOutput};
