//! Implementation of the `saltsolo run-command` command.
//!
//! Prints nothing when `salt_run_highstate` is off, so a transport that runs
//! whatever it is handed has nothing to execute.

use std::path::Path;

use anyhow::Result;
use saltsolo_lib::script::build_run_script;
use tracing::info;

use super::load_config;

pub fn cmd_run(config: &Path) -> Result<()> {
  let config = load_config(config)?;
  match build_run_script(&config) {
    Some(script) => println!("{}", script),
    None => info!("salt_run_highstate is false, no run command"),
  }
  Ok(())
}
