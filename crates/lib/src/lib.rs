//! saltsolo-lib: masterless salt provisioning
//!
//! This crate turns a provisioner configuration into what a target node
//! needs for a masterless `salt-call` run:
//! - `config`: configuration loading and the normalized value tree
//! - `render`: minion config, state top and pillar documents as text
//! - `sandbox`: the staging tree mirroring the target's filesystem
//! - `script`: install, init and run commands for the transport to execute

pub mod config;
pub mod consts;
pub mod paths;
pub mod render;
pub mod sandbox;
pub mod script;
pub mod util;
pub mod version;
