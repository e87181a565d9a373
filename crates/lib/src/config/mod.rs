//! Provisioner configuration.
//!
//! The configuration is read from a YAML file: either a flat mapping of
//! provisioner options, or a kitchen-style document whose `provisioner` key
//! holds that mapping. Every option has a default, so an empty file is a
//! valid (if not very useful) configuration.

mod value;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::version::AgentVersion;

pub use value::{ConfigValue, Key, Scalar, normalize};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read configuration {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse configuration: {0}")]
  Parse(#[from] serde_yaml::Error),

  #[error("invalid configuration: {0}")]
  Invalid(String),
}

/// How the agent gets onto the target when it is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallStrategy {
  /// Download and run the upstream bootstrap script.
  #[default]
  Bootstrap,
  /// Register a versioned apt repository and install `salt-minion`.
  Apt,
}

impl InstallStrategy {
  pub fn as_str(&self) -> &'static str {
    match self {
      InstallStrategy::Bootstrap => "bootstrap",
      InstallStrategy::Apt => "apt",
    }
  }
}

impl fmt::Display for InstallStrategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Resolved provisioner options.
///
/// Paths named `salt_*` are absolute paths on the target node; they are
/// mirrored under the sandbox root when the sandbox is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionerConfig {
  pub salt_version: AgentVersion,
  pub salt_install: InstallStrategy,
  pub salt_bootstrap_url: String,
  pub salt_bootstrap_options: String,
  pub salt_apt_repo: String,
  pub salt_apt_repo_key: String,
  /// Installer for the companion runtime the verifier needs on the target.
  pub chef_bootstrap_url: String,
  /// Where the companion runtime lives once installed.
  pub chef_omnibus_root: String,
  pub salt_config: String,
  pub salt_minion_config: String,
  pub salt_file_root: String,
  pub salt_pillar_root: String,
  pub salt_state_top: String,
  /// Copy the whole project as the formula instead of a formula subdirectory.
  pub state_collection: bool,
  /// Inline pillar documents, keyed by path relative to the pillar root.
  pub pillars: ConfigValue,
  /// Pillar documents loaded from YAML files at sandbox build time.
  #[serde(rename = "pillars-from-files")]
  pub pillars_from_files: IndexMap<Key, PathBuf>,
  pub state_top: ConfigValue,
  pub salt_run_highstate: bool,
  pub data_path: Option<PathBuf>,
  pub formula: Option<String>,
  pub kitchen_root: Option<PathBuf>,
  /// Directory on the target the sandbox is copied into.
  pub root_path: String,
  pub log_level: String,
  pub sudo: bool,
  pub sudo_command: String,
}

impl Default for ProvisionerConfig {
  fn default() -> Self {
    Self {
      salt_version: AgentVersion::Latest,
      salt_install: InstallStrategy::Bootstrap,
      salt_bootstrap_url: "http://bootstrap.saltstack.org".to_string(),
      salt_bootstrap_options: String::new(),
      salt_apt_repo: "http://apt.mccartney.ie".to_string(),
      salt_apt_repo_key: "http://apt.mccartney.ie/KEY".to_string(),
      chef_bootstrap_url: "https://www.getchef.com/chef/install.sh".to_string(),
      chef_omnibus_root: "/opt/chef".to_string(),
      salt_config: "/etc/salt".to_string(),
      salt_minion_config: "/etc/salt/minion".to_string(),
      salt_file_root: "/srv/salt".to_string(),
      salt_pillar_root: "/srv/pillar".to_string(),
      salt_state_top: "/srv/salt/top.sls".to_string(),
      state_collection: false,
      pillars: ConfigValue::default(),
      pillars_from_files: IndexMap::new(),
      state_top: ConfigValue::default(),
      salt_run_highstate: true,
      data_path: None,
      formula: None,
      kitchen_root: None,
      root_path: "/tmp/kitchen".to_string(),
      log_level: "info".to_string(),
      sudo: true,
      sudo_command: "sudo -E".to_string(),
    }
  }
}

impl ProvisionerConfig {
  /// Load configuration from a YAML file.
  ///
  /// When the file does not set `kitchen_root`, the directory holding the
  /// file is used.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, is not valid YAML, or
  /// holds an option of the wrong type.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    let mut config = Self::from_yaml_str(&content)?;

    if config.kitchen_root.is_none() {
      let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
      config.kitchen_root = Some(dir.to_path_buf());
    }

    debug!(path = %path.display(), kitchen_root = %config.kitchen_root().display(), "loaded configuration");
    Ok(config)
  }

  /// Parse configuration from YAML text.
  pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
    let document: serde_yaml::Value = serde_yaml::from_str(content)?;

    let section = match document.get("provisioner") {
      Some(provisioner) if provisioner.is_mapping() => provisioner.clone(),
      _ => document,
    };

    if section.is_null() {
      return Ok(Self::default());
    }

    let config: Self = serde_yaml::from_value(section)?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<(), ConfigError> {
    if !self.pillars.is_null() && self.pillars.as_mapping().is_none() {
      return Err(ConfigError::Invalid(
        "`pillars` must be a mapping of pillar file to document".to_string(),
      ));
    }
    if self.root_path.is_empty() {
      return Err(ConfigError::Invalid("`root_path` must not be empty".to_string()));
    }
    Ok(())
  }

  /// The project directory formulas, extensions and relative paths resolve against.
  pub fn kitchen_root(&self) -> &Path {
    self.kitchen_root.as_deref().unwrap_or(Path::new("."))
  }

  /// Resolve a host path against the project directory.
  pub fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.kitchen_root().join(path)
    }
  }
}
