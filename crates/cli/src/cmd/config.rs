use std::path::Path;

use anyhow::Result;

use super::load_config;
use crate::output::print_json;

pub fn cmd_config(config: &Path) -> Result<()> {
  let config = load_config(config)?;
  print_json(&config)
}
