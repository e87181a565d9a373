//! Sandbox construction.
//!
//! The sandbox is a local directory that mirrors, under its root, the
//! absolute paths the agent expects on the target node. It is built fresh on
//! every run and then copied to `root_path` on the target by the transport.
//!
//! A build runs these steps in order:
//!
//! 1. **Data**: copy the contents of `data_path` into `data/`.
//! 2. **Minion config**: write a masterless minion config to `salt_minion_config`.
//! 3. **State top**: render `state_top` to `salt_state_top`.
//! 4. **Pillars**: render each pillar document under `salt_pillar_root`.
//! 5. **Formula**: copy the formula and any extension directories into
//!    `salt_file_root`, or the whole project in state-collection mode.
//!
//! Configuration problems (missing formula, unreadable pillar files) are
//! detected before anything is written.

mod pillars;
mod tree;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ProvisionerConfig, normalize};
use crate::consts::{EXTENSION_DIRS, SANDBOX_DATA_DIR};
use crate::paths::mirror;
use crate::render::{RenderError, render_document, render_minion_config};
use crate::util::digest::{DigestError, TreeDigest, digest_tree};

pub use pillars::{PillarSet, merge_pillars, render_pillars};
pub use tree::{CopiedTree, SandboxTree};

/// Errors that can occur while building a sandbox.
#[derive(Debug, Error)]
pub enum SandboxError {
  #[error("sandbox root {} is not empty", path.display())]
  RootNotEmpty { path: PathBuf },

  #[error("failed to read pillar file {}: {source}", path.display())]
  ReadPillar { path: PathBuf, source: std::io::Error },

  #[error("failed to parse pillar file {}: {source}", path.display())]
  ParsePillar { path: PathBuf, source: serde_yaml::Error },

  #[error("`formula` must be set to name the formula directory")]
  MissingFormula,

  #[error("failed to render {what}: {source}")]
  Render { what: String, source: RenderError },

  #[error("{} would be written outside the sandbox", path.display())]
  OutsideRoot { path: PathBuf },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write {}: {source}", path.display())]
  WriteFile { path: PathBuf, source: std::io::Error },

  #[error("failed to read directory {}: {source}", path.display())]
  ReadDir { path: PathBuf, source: std::io::Error },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy {
    from: PathBuf,
    to: PathBuf,
    source: std::io::Error,
  },

  #[error("failed to walk {}: {source}", path.display())]
  WalkDir { path: PathBuf, source: walkdir::Error },

  #[error("failed to compute sandbox digest: {0}")]
  Digest(#[from] DigestError),
}

/// Broad class of a [`SandboxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The configuration or a file it points at is unusable.
  Configuration,
  /// Reading from or writing to the filesystem failed.
  Filesystem,
}

impl SandboxError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      SandboxError::ReadPillar { .. }
      | SandboxError::ParsePillar { .. }
      | SandboxError::MissingFormula
      | SandboxError::Render { .. }
      | SandboxError::OutsideRoot { .. } => ErrorKind::Configuration,
      _ => ErrorKind::Filesystem,
    }
  }
}

/// What a sandbox build produced.
#[derive(Debug, Clone, Serialize)]
pub struct SandboxReport {
  pub root: PathBuf,
  /// Rendered files, relative to the root, in the order they were written.
  pub artifacts: Vec<PathBuf>,
  /// Directory trees copied in.
  pub copies: Vec<CopiedTree>,
  /// SHA-256 over the whole tree.
  pub digest: TreeDigest,
}

/// Builds a sandbox from a resolved configuration.
pub struct SandboxBuilder<'a> {
  config: &'a ProvisionerConfig,
  root: PathBuf,
}

impl<'a> SandboxBuilder<'a> {
  pub fn new(config: &'a ProvisionerConfig, root: impl Into<PathBuf>) -> Self {
    Self {
      config,
      root: root.into(),
    }
  }

  /// Build the sandbox.
  ///
  /// # Errors
  ///
  /// Any failure aborts the build. A partially written sandbox is left in
  /// place for the caller to inspect or remove.
  pub fn build(&self) -> Result<SandboxReport, SandboxError> {
    let formula = self.formula()?;
    let pillars = merge_pillars(self.config)?;

    info!(root = %self.root.display(), "building sandbox");
    let mut tree = SandboxTree::create(&self.root)?;

    self.prepare_data(&mut tree)?;
    self.prepare_minion(&mut tree)?;
    self.prepare_state_top(&mut tree)?;
    self.prepare_pillars(&mut tree, &pillars)?;

    if self.config.state_collection {
      self.prepare_state_collection(&mut tree, formula)?;
    } else {
      self.prepare_formula(&mut tree, formula)?;
    }

    let digest = digest_tree(tree.root())?;
    info!(root = %tree.root().display(), digest = %digest, "sandbox ready");

    Ok(SandboxReport {
      root: tree.root().to_path_buf(),
      artifacts: tree.written().to_vec(),
      copies: tree.copied().to_vec(),
      digest,
    })
  }

  fn formula(&self) -> Result<&'a str, SandboxError> {
    match self.config.formula.as_deref() {
      Some(name) if !name.is_empty() => Ok(name),
      _ => Err(SandboxError::MissingFormula),
    }
  }

  fn prepare_data(&self, tree: &mut SandboxTree) -> Result<(), SandboxError> {
    let Some(data_path) = &self.config.data_path else {
      return Ok(());
    };

    info!("preparing data");
    let source = self.config.resolve(data_path);
    debug!(source = %source.display(), "using data");
    tree.copy_contents(&source, Path::new(SANDBOX_DATA_DIR))
  }

  fn prepare_minion(&self, tree: &mut SandboxTree) -> Result<(), SandboxError> {
    info!("preparing salt-minion");
    let content = render_minion_config(
      &self.config.root_path,
      &self.config.salt_file_root,
      &self.config.salt_pillar_root,
    );
    tree.write(&mirror(&self.config.salt_minion_config), content.as_bytes())
  }

  fn prepare_state_top(&self, tree: &mut SandboxTree) -> Result<(), SandboxError> {
    info!("preparing state_top");
    let content = render_document(&normalize(&self.config.state_top)).map_err(|source| SandboxError::Render {
      what: "state_top".to_string(),
      source,
    })?;
    tree.write(&mirror(&self.config.salt_state_top), content.as_bytes())
  }

  fn prepare_pillars(&self, tree: &mut SandboxTree, pillars: &PillarSet) -> Result<(), SandboxError> {
    info!(pillar_root = %self.config.salt_pillar_root, count = pillars.len(), "preparing pillars");
    let pillar_root = mirror(&self.config.salt_pillar_root);

    for (relative, text) in render_pillars(pillars)? {
      tree.write(&pillar_root.join(relative), text.as_bytes())?;
    }
    Ok(())
  }

  fn prepare_formula(&self, tree: &mut SandboxTree, formula: &str) -> Result<(), SandboxError> {
    info!(formula, "preparing formula");
    let kitchen_root = self.config.kitchen_root();
    let file_root = mirror(&self.config.salt_file_root);
    let formula = mirror(formula);

    tree.copy_contents(&kitchen_root.join(&formula), &file_root.join(&formula))?;

    for extension in EXTENSION_DIRS {
      let source = kitchen_root.join(extension);
      if source.is_dir() {
        debug!(source = %source.display(), "copying extension directory");
        tree.copy_contents(&source, &file_root.join(extension))?;
      } else {
        debug!(source = %source.display(), "extension directory absent, skipping");
      }
    }
    Ok(())
  }

  fn prepare_state_collection(&self, tree: &mut SandboxTree, formula: &str) -> Result<(), SandboxError> {
    info!(formula, "preparing state collection");
    let destination = mirror(&self.config.salt_file_root).join(mirror(formula));
    tree.copy_contents(self.config.kitchen_root(), &destination)
  }
}
