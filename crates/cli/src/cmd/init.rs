use std::path::Path;

use anyhow::Result;
use saltsolo_lib::script::build_init_script;
use tracing::debug;

use super::load_config;

pub fn cmd_init(config: &Path) -> Result<()> {
  let config = load_config(config)?;
  debug!(root_path = %config.root_path, "cleaning root path");
  println!("{}", build_init_script(&config));
  Ok(())
}
