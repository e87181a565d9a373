//! Shell command text for the target node.
//!
//! Nothing here executes anything: each builder returns a string that the
//! transport runs on the target, and the exit status of that string is the
//! only signal coming back.

mod install;
mod run;
mod shell;

pub use install::{CompanionRuntime, InstallPlan, build_install_script, install_command};
pub use run::build_run_script;
pub use shell::{SHELL_HELPERS, Sudo};

use crate::config::ProvisionerConfig;

/// Build the command that resets `root_path` on the target before the
/// sandbox is copied over.
pub fn build_init_script(config: &ProvisionerConfig) -> String {
  let sudo = Sudo::from_config(config);
  format!(
    "{} ; mkdir -p {}",
    sudo.wrap(&format!("rm -rf {}", config.root_path)),
    config.root_path
  )
}
