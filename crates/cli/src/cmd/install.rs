use std::path::Path;

use anyhow::Result;
use saltsolo_lib::script::install_command;

use super::load_config;

pub fn cmd_install(config: &Path) -> Result<()> {
  let config = load_config(config)?;
  println!("{}", install_command(&config));
  Ok(())
}
