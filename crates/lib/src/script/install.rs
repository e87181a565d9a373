//! Install-or-verify script for the salt agent.
//!
//! The generated script runs on the target and walks this sequence:
//!
//! 1. Ask `salt-call --version` what is installed.
//! 2. If nothing is, install with the planned strategy (bootstrap script or
//!    apt repository).
//! 3. Ask again and classify: still missing is fatal; the requested version
//!    (or any version when `latest` was asked for) is a success; a different
//!    version is tolerated after a bootstrap install, which cannot pin
//!    versions reliably, and fatal otherwise.
//! 4. Install the companion runtime the verifier needs if it is missing.
//!
//! Fatal outcomes exit with [`INSTALL_FAILURE_EXIT`].

use tracing::debug;

use crate::config::{InstallStrategy, ProvisionerConfig};
use crate::consts::INSTALL_FAILURE_EXIT;
use crate::version::AgentVersion;

use super::shell::{SHELL_HELPERS, Sudo, escape_single_quotes};

/// Everything the install script needs to know about the agent install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
  pub strategy: InstallStrategy,
  pub requested_version: AgentVersion,
  pub bootstrap_options: String,
  pub repo_url: String,
  pub repo_key_url: String,
  pub bootstrap_url: String,
}

impl InstallPlan {
  /// Derive the plan from configuration.
  ///
  /// A bootstrap install of a specific version with no explicit options
  /// gets options asking the bootstrap script for a git install of exactly
  /// that version.
  pub fn from_config(config: &ProvisionerConfig) -> Self {
    let mut bootstrap_options = config.salt_bootstrap_options.clone();

    if !config.salt_version.is_latest()
      && config.salt_install == InstallStrategy::Bootstrap
      && bootstrap_options.is_empty()
    {
      debug!(version = %config.salt_version, "using bootstrap git install for requested version");
      bootstrap_options = format!("-P git v{}", config.salt_version);
    }

    Self {
      strategy: config.salt_install,
      requested_version: config.salt_version.clone(),
      bootstrap_options,
      repo_url: config.salt_apt_repo.clone(),
      repo_key_url: config.salt_apt_repo_key.clone(),
      bootstrap_url: config.salt_bootstrap_url.clone(),
    }
  }
}

/// The runtime the verification harness needs on the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionRuntime {
  pub installer_url: String,
  /// Directory whose presence means the runtime is already installed.
  pub install_root: String,
}

impl CompanionRuntime {
  pub fn from_config(config: &ProvisionerConfig) -> Self {
    Self {
      installer_url: config.chef_bootstrap_url.clone(),
      install_root: config.chef_omnibus_root.clone(),
    }
  }
}

/// Build the install script for `plan`.
///
/// The result is a single `sh -c '...'` word. Single quotes in configured
/// values are escaped, so the script stays intact whatever they contain.
pub fn build_install_script(plan: &InstallPlan, companion: &CompanionRuntime, sudo: &Sudo) -> String {
  let version = plan.requested_version.as_str();

  let install = match plan.strategy {
    InstallStrategy::Bootstrap => format!(
      "  do_download {url} /tmp/bootstrap-salt.sh\n  {sh} /tmp/bootstrap-salt.sh {options}",
      url = plan.bootstrap_url,
      sh = sudo.wrap("sh"),
      options = plan.bootstrap_options,
    ),
    InstallStrategy::Apt => format!(
      r#"  . /etc/lsb-release

  echo "deb {repo}/salt-{version} ${{DISTRIB_CODENAME}} main" | {tee} /etc/apt/sources.list.d/salt-{version}.list

  do_download {key} /tmp/repo.key
  {apt_key} add /tmp/repo.key

  {apt_get} update
  {apt_get} install -y salt-minion"#,
      repo = plan.repo_url,
      key = plan.repo_key_url,
      tee = sudo.wrap("tee"),
      apt_key = sudo.wrap("apt-key"),
      apt_get = sudo.wrap("apt-get"),
    ),
  };

  let mismatch = match plan.strategy {
    InstallStrategy::Bootstrap => {
      r#"else
  echo "You asked for bootstrap install and you have got ${SALT_VERSION}, hope thats ok!""#
        .to_string()
    }
    InstallStrategy::Apt => format!(
      r#"else
  echo "You asked for {version} and you have got ${{SALT_VERSION}} installed, dunno how to fix that, sorry!"
  exit {INSTALL_FAILURE_EXIT}"#
    ),
  };

  let body = format!(
    r#"{SHELL_HELPERS}

# what version of salt is installed?
SALT_VERSION=`salt-call --version 2>/dev/null | cut -d " " -f 2`

if [ -z "${{SALT_VERSION}}" ]
then
{install}
fi

# check again, now that an install of some form should have happened
SALT_VERSION=`salt-call --version 2>/dev/null | cut -d " " -f 2`

if [ -z "${{SALT_VERSION}}" ]
then
  echo "No salt-minion installed, install must have failed!!"
  echo "salt_install = {strategy}"
  echo "salt_url = {bootstrap_url}"
  echo "bootstrap_options = {options}"
  echo "salt_version = {version}"
  echo "salt_apt_repo = {repo}"
  echo "salt_apt_repo_key = {key}"
  exit {INSTALL_FAILURE_EXIT}
elif [ "${{SALT_VERSION}}" = "{version}" -o "{version}" = "latest" ]
then
  echo "You asked for {version} and you have ${{SALT_VERSION}} installed, sweet!"
{mismatch}
fi

# the verifier runs on this runtime
if [ ! -d "{companion_root}" ]
then
  echo "-----> Installing Chef Omnibus"
  do_download {companion_url} /tmp/install.sh
  {sh} /tmp/install.sh
fi
"#,
    strategy = plan.strategy,
    bootstrap_url = plan.bootstrap_url,
    options = plan.bootstrap_options,
    repo = plan.repo_url,
    key = plan.repo_key_url,
    companion_root = companion.install_root,
    companion_url = companion.installer_url,
    sh = sudo.wrap("sh"),
  );

  format!("sh -c '\n{}'", escape_single_quotes(&body))
}

/// Build the install script straight from configuration.
pub fn install_command(config: &ProvisionerConfig) -> String {
  build_install_script(
    &InstallPlan::from_config(config),
    &CompanionRuntime::from_config(config),
    &Sudo::from_config(config),
  )
}
