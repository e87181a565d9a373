//! Test utilities for saltsolo-lib.
//!
//! Generated scripts are exercised against fake executables (`salt-call`
//! and friends) placed in a temporary directory at the front of `PATH`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Write an executable shell script named `name` into `dir`.
#[cfg(unix)]
pub fn fake_executable(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
  fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  path
}

/// Returns `PATH` with `dir` prepended.
pub fn path_with(dir: &Path) -> String {
  match std::env::var("PATH") {
    Ok(path) => format!("{}:{}", dir.display(), path),
    Err(_) => dir.display().to_string(),
  }
}

/// Run `script` with `shell -c`, resolving commands from `bin_dir` first.
pub fn run_script(shell: &str, script: &str, bin_dir: &Path) -> Output {
  Command::new(shell)
    .arg("-c")
    .arg(script)
    .env("PATH", path_with(bin_dir))
    .output()
    .unwrap_or_else(|e| panic!("failed to spawn {}: {}", shell, e))
}

/// Stdout of a finished script as a string.
pub fn stdout_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}
