//! Sandbox tree digests.
//!
//! Two sandboxes built from the same inputs must be byte-identical. The
//! digest folds the whole tree into one SHA-256 so that can be checked and
//! reported without diffing directories. Timestamps and permissions are not
//! part of it.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum DigestError {
  #[error("failed to walk {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },

  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },
}

/// Lowercase hex SHA-256 of a directory tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TreeDigest(String);

impl TreeDigest {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// First 12 hex digits, for display.
  pub fn short(&self) -> &str {
    &self.0[..self.0.len().min(12)]
  }
}

impl fmt::Display for TreeDigest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Digest everything below `root`.
///
/// Each entry contributes a kind tag, its `/`-separated path relative to
/// `root`, and then its payload: the length-prefixed contents of a file or
/// the target of a symlink. Entries are visited in file-name order, so the
/// result does not depend on directory listing order.
pub fn digest_tree(root: &Path) -> Result<TreeDigest, DigestError> {
  let mut hasher = Sha256::new();

  for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
    let entry = entry.map_err(|source| DigestError::Walk {
      path: root.to_path_buf(),
      source,
    })?;
    let path = entry.path();
    let read_err = |source| DigestError::Read {
      path: path.to_path_buf(),
      source,
    };

    let relative = path.strip_prefix(root).unwrap_or(path);
    let name: Vec<String> = relative
      .components()
      .map(|c| c.as_os_str().to_string_lossy().into_owned())
      .collect();

    let file_type = entry.file_type();
    let tag: &[u8] = if file_type.is_dir() {
      b"D"
    } else if file_type.is_symlink() {
      b"L"
    } else if file_type.is_file() {
      b"F"
    } else {
      continue;
    };

    hasher.update(tag);
    hasher.update(name.join("/").as_bytes());
    hasher.update([0u8]);

    if file_type.is_file() {
      let mut file = fs::File::open(path).map_err(read_err)?;
      let len = file.metadata().map_err(read_err)?.len();
      hasher.update(len.to_le_bytes());
      io::copy(&mut file, &mut hasher).map_err(read_err)?;
    } else if file_type.is_symlink() {
      let target = fs::read_link(path).map_err(read_err)?;
      hasher.update(target.to_string_lossy().as_bytes());
      hasher.update([0u8]);
    }
  }

  Ok(TreeDigest(format!("{:x}", hasher.finalize())))
}
