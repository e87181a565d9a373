//! The staging tree and the filesystem operations that populate it.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use super::SandboxError;

/// A directory copied into the sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedTree {
  /// Host directory whose contents were copied.
  pub source: PathBuf,
  /// Destination, relative to the sandbox root.
  pub destination: PathBuf,
}

/// A sandbox root plus a record of everything written into it.
#[derive(Debug)]
pub struct SandboxTree {
  root: PathBuf,
  written: Vec<PathBuf>,
  copied: Vec<CopiedTree>,
}

impl SandboxTree {
  /// Open `root` as a fresh sandbox, creating it if needed.
  ///
  /// # Errors
  ///
  /// Fails if `root` already has contents; sandboxes are never reused.
  pub fn create(root: &Path) -> Result<Self, SandboxError> {
    if root.exists() {
      let mut entries = fs::read_dir(root).map_err(|source| SandboxError::ReadDir {
        path: root.to_path_buf(),
        source,
      })?;
      if entries.next().is_some() {
        return Err(SandboxError::RootNotEmpty {
          path: root.to_path_buf(),
        });
      }
    }

    create_dir(root)?;
    let root = root.canonicalize().map_err(|source| SandboxError::ReadDir {
      path: root.to_path_buf(),
      source,
    })?;

    Ok(Self {
      root,
      written: Vec::new(),
      copied: Vec::new(),
    })
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Files written so far, relative to the root, in write order.
  pub fn written(&self) -> &[PathBuf] {
    &self.written
  }

  /// Directories copied so far, in copy order.
  pub fn copied(&self) -> &[CopiedTree] {
    &self.copied
  }

  /// Resolve `relative` under the root. Absolute paths and `..` are refused.
  fn inside_root(&self, relative: &Path) -> Result<PathBuf, SandboxError> {
    let escapes = relative
      .components()
      .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
      return Err(SandboxError::OutsideRoot {
        path: relative.to_path_buf(),
      });
    }
    Ok(self.root.join(relative))
  }

  /// Write `contents` to `relative`, creating parent directories.
  pub fn write(&mut self, relative: &Path, contents: &[u8]) -> Result<(), SandboxError> {
    let path = self.inside_root(relative)?;
    if let Some(parent) = path.parent() {
      create_dir(parent)?;
    }

    debug!(path = %path.display(), bytes = contents.len(), "writing sandbox file");
    fs::write(&path, contents).map_err(|source| SandboxError::WriteFile { path, source })?;

    self.written.push(relative.to_path_buf());
    Ok(())
  }

  /// Copy the contents of `source` into `relative`.
  ///
  /// Top-level entries starting with `.` are skipped, the way a shell
  /// `source/*` glob would skip them. Everything below is copied as is.
  /// The sandbox itself is never copied into itself when it lives inside
  /// `source`.
  pub fn copy_contents(&mut self, source: &Path, relative: &Path) -> Result<(), SandboxError> {
    let destination = self.inside_root(relative)?;
    create_dir(&destination)?;

    let read_dir = |path: &Path| {
      fs::read_dir(path).map_err(|source| SandboxError::ReadDir {
        path: path.to_path_buf(),
        source,
      })
    };

    let mut entries = Vec::new();
    for entry in read_dir(source)? {
      let entry = entry.map_err(|e| SandboxError::ReadDir {
        path: source.to_path_buf(),
        source: e,
      })?;
      entries.push(entry.path());
    }
    entries.sort();

    for entry in entries {
      let Some(name) = entry.file_name() else {
        continue;
      };
      if name.to_string_lossy().starts_with('.') {
        continue;
      }
      if entry.canonicalize().is_ok_and(|p| self.root.starts_with(&p)) {
        debug!(path = %entry.display(), "skipping directory that contains the sandbox");
        continue;
      }
      copy_tree(&entry, &destination.join(name))?;
    }

    debug!(source = %source.display(), destination = %destination.display(), "copied directory contents");
    self.copied.push(CopiedTree {
      source: source.to_path_buf(),
      destination: relative.to_path_buf(),
    });
    Ok(())
  }
}

fn create_dir(path: &Path) -> Result<(), SandboxError> {
  fs::create_dir_all(path).map_err(|source| SandboxError::CreateDir {
    path: path.to_path_buf(),
    source,
  })
}

/// Recursively copy `from` (a file, symlink or directory) to `to`.
fn copy_tree(from: &Path, to: &Path) -> Result<(), SandboxError> {
  for entry in WalkDir::new(from).sort_by_file_name() {
    let entry = entry.map_err(|source| SandboxError::WalkDir {
      path: from.to_path_buf(),
      source,
    })?;

    let rel = entry.path().strip_prefix(from).unwrap_or(entry.path());
    let target = if rel.as_os_str().is_empty() {
      to.to_path_buf()
    } else {
      to.join(rel)
    };

    let file_type = entry.file_type();
    if file_type.is_dir() {
      create_dir(&target)?;
    } else if file_type.is_symlink() {
      copy_symlink(entry.path(), &target)?;
    } else {
      fs::copy(entry.path(), &target).map_err(|source| SandboxError::Copy {
        from: entry.path().to_path_buf(),
        to: target.clone(),
        source,
      })?;
    }
  }
  Ok(())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> Result<(), SandboxError> {
  let copy_err = |source| SandboxError::Copy {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source,
  };
  let link = fs::read_link(from).map_err(copy_err)?;
  if to.symlink_metadata().is_ok() {
    fs::remove_file(to).map_err(copy_err)?;
  }
  std::os::unix::fs::symlink(link, to).map_err(copy_err)
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> Result<(), SandboxError> {
  fs::copy(from, to).map(|_| ()).map_err(|source| SandboxError::Copy {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source,
  })
}
