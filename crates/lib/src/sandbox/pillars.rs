//! Pillar set assembly.

use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::debug;

use crate::config::{ConfigValue, Key, ProvisionerConfig, normalize};
use crate::paths::mirror;
use crate::render::render_document;

use super::SandboxError;

/// Pillar documents keyed by their path relative to the pillar root.
pub type PillarSet = IndexMap<Key, ConfigValue>;

/// Build the pillar set: inline `pillars` first, then every
/// `pillars-from-files` entry loaded from disk. A loaded entry replaces an
/// inline entry with the same key.
pub fn merge_pillars(config: &ProvisionerConfig) -> Result<PillarSet, SandboxError> {
  let mut pillars = match normalize(&config.pillars) {
    ConfigValue::Mapping(map) => map,
    _ => IndexMap::new(),
  };

  for (key, file) in &config.pillars_from_files {
    let path = config.resolve(file);
    debug!(key = %key, path = %path.display(), "loading external pillar");

    let content = fs::read_to_string(&path).map_err(|source| SandboxError::ReadPillar {
      path: path.clone(),
      source,
    })?;
    let document: ConfigValue =
      serde_yaml::from_str(&content).map_err(|source| SandboxError::ParsePillar { path, source })?;

    pillars.insert(key.to_plain(), normalize(&document));
  }

  Ok(pillars)
}

/// Render every pillar document, in set order.
///
/// Keys are paths under the pillar root; a leading `/` does not make them
/// host-absolute.
pub fn render_pillars(pillars: &PillarSet) -> Result<Vec<(PathBuf, String)>, SandboxError> {
  pillars
    .iter()
    .map(|(key, document)| {
      let relative = mirror(&key.to_string());
      let text = render_document(document).map_err(|source| SandboxError::Render {
        what: format!("pillar {}", key),
        source,
      })?;
      debug!(pillar = %key, "rendered pillar:\n{}", text);
      Ok((relative, text))
    })
    .collect()
}
