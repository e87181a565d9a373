//! The convergence run command.
//!
//! `salt-call` exit codes are unreliable: releases up to
//! [`RETCODE_PASSTHROUGH_VERSION`](crate::consts::RETCODE_PASSTHROUGH_VERSION)
//! exit 0 on failed states. The run command therefore tees the output to
//! [`RUN_OUTPUT_FILE`] and decides the outcome in this order:
//!
//! 1. a nonzero `salt-call` exit status is passed through unchanged;
//! 2. otherwise a line matching [`FAILURE_PATTERN`] fails the run with 1;
//! 3. otherwise the run succeeded.
//!
//! A failed state that neither sets the exit code nor prints a matching
//! line is reported as success.

use tracing::debug;

use crate::config::ProvisionerConfig;
use crate::consts::{FAILURE_PATTERN, RUN_OUTPUT_FILE};
use crate::paths::target_join;

use super::shell::Sudo;

/// Build the run command, or `None` when `salt_run_highstate` is off.
pub fn build_run_script(config: &ProvisionerConfig) -> Option<String> {
  if !config.salt_run_highstate {
    debug!("salt_run_highstate is disabled, nothing to run");
    return None;
  }

  let sudo = Sudo::from_config(config);
  let config_dir = target_join(&config.root_path, &config.salt_config);

  let mut salt_call = sudo.wrap(&format!("salt-call --config-dir={} --local state.highstate", config_dir));
  salt_call.push_str(&format!(" --log-level={}", config.log_level));

  if config.salt_version.supports_retcode_passthrough() {
    salt_call.push_str(" --retcode-passthrough");
  }

  Some(classify_output(&salt_call))
}

/// Wrap `command` so its outcome is decided by exit status, then output.
fn classify_output(command: &str) -> String {
  let fail_grep = format!("grep -e {}", FAILURE_PATTERN);

  format!(
    "set -o pipefail ; {command} 2>&1 | tee {output} ; SC=$? ; echo salt-call exit code: $SC ; \
     (sed '/{fail_grep}/d' {output} | {fail_grep} ; EC=$? ; echo salt-call output grep exit code ${{EC}} ; \
     [ ${{SC}} -ne 0 ] && exit ${{SC}} ; [ ${{EC}} -eq 0 ] && exit 1 ; [ ${{EC}} -eq 1 ] && exit 0)",
    output = RUN_OUTPUT_FILE,
  )
}
