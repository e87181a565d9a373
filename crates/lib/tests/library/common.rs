//! Shared helpers for library integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use saltsolo_lib::config::ProvisionerConfig;
use tempfile::TempDir;

/// A project directory plus an empty sandbox directory.
pub struct Project {
  pub dir: TempDir,
  pub sandbox: TempDir,
}

impl Project {
  pub fn new() -> Self {
    Self {
      dir: TempDir::new().unwrap(),
      sandbox: TempDir::new().unwrap(),
    }
  }

  /// Write a file relative to the project directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.dir.path().join(relative_path);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
  }

  /// Write `.kitchen.yml` and load it the way the CLI does.
  pub fn config(&self, yaml: &str) -> ProvisionerConfig {
    self.write_file(".kitchen.yml", yaml);
    ProvisionerConfig::load(&self.dir.path().join(".kitchen.yml")).unwrap()
  }

  pub fn sandbox_root(&self) -> &Path {
    self.sandbox.path()
  }
}

/// Every file and symlink under `root`, relative to it, sorted.
pub fn files_under(root: &Path) -> Vec<PathBuf> {
  let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
    .into_iter()
    .filter_map(Result::ok)
    .filter(|e| !e.file_type().is_dir())
    .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
    .collect();
  files.sort();
  files
}

/// Remove everything inside `root`, keeping `root` itself.
pub fn empty_dir(root: &Path) {
  for entry in fs::read_dir(root).unwrap() {
    let path = entry.unwrap().path();
    if path.is_dir() {
      fs::remove_dir_all(&path).unwrap();
    } else {
      fs::remove_file(&path).unwrap();
    }
  }
}
