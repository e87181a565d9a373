//! Shell fragments shared by the generated scripts.

use crate::config::ProvisionerConfig;

/// Prefix for commands that need root on the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudo(Option<String>);

impl Sudo {
  pub fn from_config(config: &ProvisionerConfig) -> Self {
    if config.sudo {
      Sudo(Some(config.sudo_command.clone()))
    } else {
      Sudo(None)
    }
  }

  /// Prefix `command` with the sudo command, if enabled.
  pub fn wrap(&self, command: &str) -> String {
    match &self.0 {
      Some(sudo) if !sudo.is_empty() => format!("{} {}", sudo, command),
      _ => command.to_string(),
    }
  }
}

/// Make `text` safe inside a single-quoted shell word.
///
/// Each `'` becomes `'\''`: close the quote, emit an escaped quote, reopen.
pub fn escape_single_quotes(text: &str) -> String {
  text.replace('\'', r"'\''")
}

/// Helper functions prepended to the install script.
///
/// `do_download URL FILE` tries wget, curl and python3 in turn.
pub const SHELL_HELPERS: &str = r#"exists() {
  if command -v $1 >/dev/null 2>&1
  then
    return 0
  else
    return 1
  fi
}

do_download() {
  echo "downloading $1"
  echo "  to file $2"

  if exists wget; then
    wget -q -O "$2" "$1" 2>/tmp/stderr && return 0
  fi
  if exists curl; then
    curl -sSL -o "$2" "$1" 2>/tmp/stderr && return 0
  fi
  if exists python3; then
    python3 -c "import sys, urllib.request; urllib.request.urlretrieve(sys.argv[1], sys.argv[2])" "$1" "$2" 2>/tmp/stderr && return 0
  fi

  echo "Unable to download $1: wget, curl and python3 all failed or are missing"
  cat /tmp/stderr 2>/dev/null
  return 1
}"#;
