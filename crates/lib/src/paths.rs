//! Mapping between target-absolute paths and their place in the sandbox.
//!
//! The sandbox mirrors the target filesystem under a staging root, so
//! `/etc/salt/minion` on the target is `<sandbox>/etc/salt/minion` locally.
//! `Path::join` would discard the base for an absolute argument, hence the
//! explicit helpers here.

use std::path::PathBuf;

/// Returns the sandbox-relative path for a target-absolute path.
pub fn mirror(target: &str) -> PathBuf {
  PathBuf::from(target.trim_start_matches('/'))
}

/// Joins two target path fragments with exactly one separator between them.
///
/// `target_join("/tmp/kitchen", "/srv/salt")` is `/tmp/kitchen/srv/salt`.
pub fn target_join(base: &str, path: &str) -> String {
  format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
