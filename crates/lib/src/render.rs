//! Text rendering for the artifacts placed in the sandbox.
//!
//! Documents are serialized with `serde_yaml`. Some YAML emitters write a
//! bare wildcard key as an explicitly tagged scalar (`! '*'`), which salt
//! refuses to load, so every rendered document goes through
//! [`fix_wildcard_keys`] before it is written.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::config::ConfigValue;
use crate::paths::target_join;

static TAGGED_WILDCARD: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"!\s'\*'").expect("wildcard pattern is a valid regex"));

#[derive(Debug, Error)]
#[error("failed to render document: {0}")]
pub struct RenderError(#[from] serde_yaml::Error);

/// Render a normalized value as a YAML document with wildcard keys fixed up.
pub fn render_document(value: &ConfigValue) -> Result<String, RenderError> {
  let text = serde_yaml::to_string(value)?;
  Ok(fix_wildcard_keys(&text))
}

/// Replace every tagged wildcard (`! '*'`) with a plain quoted `'*'`.
pub fn fix_wildcard_keys(text: &str) -> String {
  TAGGED_WILDCARD.replace_all(text, "'*'").into_owned()
}

/// Render the minion configuration for a masterless run.
///
/// The minion reads states and pillars from local roots under `root_path`
/// instead of asking a master for them.
pub fn render_minion_config(root_path: &str, file_root: &str, pillar_root: &str) -> String {
  format!(
    "state_top: top.sls

file_client: local

file_roots:
 base:
   - {}

pillar_roots:
 base:
   - {}
",
    target_join(root_path, file_root),
    target_join(root_path, pillar_root)
  )
}
