//! Implementation of the `saltsolo sandbox` command.
//!
//! Builds the sandbox and reports where it is. Without `--sandbox` the
//! sandbox goes into a new temporary directory that outlives the process,
//! since the transport still has to copy it.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use saltsolo_lib::consts::APP_NAME;
use saltsolo_lib::sandbox::SandboxBuilder;

use super::load_config;
use crate::output::{OutputFormat, format_duration, print_info, print_json, print_stat, print_success};

pub fn cmd_sandbox(config: &Path, sandbox: Option<&Path>, format: OutputFormat) -> Result<()> {
  let config = load_config(config)?;

  let root = match sandbox {
    Some(dir) => dir.to_path_buf(),
    None => temporary_root()?,
  };

  let start = Instant::now();
  let report = SandboxBuilder::new(&config, &root)
    .build()
    .with_context(|| format!("Failed to build sandbox in {}", root.display()))?;
  let elapsed = start.elapsed();

  if format.is_json() {
    return print_json(&report);
  }

  print_success(&format!("Sandbox ready: {}", report.root.display()));
  print_stat("Digest", report.digest.short());
  print_stat("Artifacts", &report.artifacts.len().to_string());
  print_stat("Copies", &report.copies.len().to_string());
  print_stat("Time", &format_duration(elapsed));

  for artifact in &report.artifacts {
    print_info(&artifact.display().to_string());
  }
  for copy in &report.copies {
    print_info(&format!("{} <- {}", copy.destination.display(), copy.source.display()));
  }

  Ok(())
}

fn temporary_root() -> Result<PathBuf> {
  let dir = tempfile::Builder::new()
    .prefix(&format!("{}-sandbox-", APP_NAME))
    .tempdir()
    .context("Failed to create temporary sandbox directory")?;
  Ok(dir.keep())
}
