//! Generated command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn install_command_for_apt() {
  let env = TestEnv::new("formula: nginx\nsalt_install: apt\nsalt_version: 2016.3.0\n");

  env
    .saltsolo_cmd()
    .arg("install-command")
    .assert()
    .success()
    .stdout(predicate::str::starts_with("sh -c '"))
    .stdout(predicate::str::contains("sudo -E apt-get install -y salt-minion"))
    .stdout(predicate::str::contains("bootstrap-salt.sh").not());
}

#[test]
fn install_command_without_sudo() {
  let env = TestEnv::new("formula: nginx\nsudo: false\nsalt_version: 2017.7.0\n");

  env
    .saltsolo_cmd()
    .arg("install-command")
    .assert()
    .success()
    .stdout(predicate::str::contains("  sh /tmp/bootstrap-salt.sh -P git v2017.7.0"))
    .stdout(predicate::str::contains("sudo -E").not());
}

#[test]
fn run_command_with_passthrough() {
  let env = TestEnv::new("formula: nginx\nsalt_version: 2016.3.0\nlog_level: warning\n");

  env
    .saltsolo_cmd()
    .arg("run-command")
    .assert()
    .success()
    .stdout(predicate::str::starts_with("set -o pipefail ; sudo -E salt-call"))
    .stdout(predicate::str::contains("--log-level=warning --retcode-passthrough"));
}

#[test]
fn run_command_is_empty_when_highstate_disabled() {
  let env = TestEnv::new("formula: nginx\nsalt_run_highstate: false\n");

  env
    .saltsolo_cmd()
    .arg("run-command")
    .assert()
    .success()
    .stdout(predicate::str::is_empty());
}

#[test]
fn init_command_uses_root_path() {
  let env = TestEnv::new("provisioner:\n  root_path: /tmp/converge\n");

  env
    .saltsolo_cmd()
    .arg("init-command")
    .assert()
    .success()
    .stdout("sudo -E rm -rf /tmp/converge ; mkdir -p /tmp/converge\n");
}

#[test]
fn config_dumps_resolved_options() {
  let env = TestEnv::new("formula: nginx\nsalt_version: 2017.7.0\n");

  let output = env.saltsolo_cmd().arg("config").output().unwrap();
  assert!(output.status.success());

  let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(config["formula"], "nginx");
  assert_eq!(config["salt_version"], "2017.7.0");
  assert_eq!(config["salt_install"], "bootstrap");
  assert_eq!(config["root_path"], "/tmp/kitchen");
  assert!(config["kitchen_root"].as_str().is_some());
}

#[test]
fn config_path_can_be_given_explicitly() {
  let env = TestEnv::new("formula: nginx\n");
  env.write_file("other/kitchen.yml", "formula: apache\n");

  env
    .saltsolo_cmd()
    .args(["config", "other/kitchen.yml"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"formula\": \"apache\""));
}
