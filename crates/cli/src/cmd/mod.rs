mod config;
mod init;
mod install;
mod run;
mod sandbox;

use std::path::Path;

use anyhow::{Context, Result};
use saltsolo_lib::config::ProvisionerConfig;

pub use config::cmd_config;
pub use init::cmd_init;
pub use install::cmd_install;
pub use run::cmd_run;
pub use sandbox::cmd_sandbox;

/// Load the configuration file, anchoring relative paths at its real location.
fn load_config(path: &Path) -> Result<ProvisionerConfig> {
  let path = dunce::canonicalize(path).with_context(|| format!("Config file not found: {}", path.display()))?;
  ProvisionerConfig::load(&path).with_context(|| format!("Failed to load config: {}", path.display()))
}
