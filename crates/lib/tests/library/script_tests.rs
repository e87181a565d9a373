use std::process::Command;

use saltsolo_lib::script::{build_init_script, build_run_script, install_command};
use serial_test::serial;

use super::common::Project;

#[test]
fn commands_follow_kitchen_provisioner_section() {
  let project = Project::new();
  let config = project.config(
    r#"
driver:
  name: docker
provisioner:
  name: salt_solo
  formula: nginx
  salt_install: apt
  salt_version: 2015.8.8
  root_path: /var/tmp/kitchen
  sudo_command: sudo -n
"#,
  );

  let install = install_command(&config);
  assert!(install.contains("sudo -n apt-get install -y salt-minion"));
  assert!(install.contains("salt-2015.8.8"));

  let run = build_run_script(&config).unwrap();
  assert!(run.contains("sudo -n salt-call --config-dir=/var/tmp/kitchen/etc/salt --local state.highstate"));
  assert!(run.contains("--retcode-passthrough"));

  assert_eq!(
    build_init_script(&config),
    "sudo -n rm -rf /var/tmp/kitchen ; mkdir -p /var/tmp/kitchen"
  );
}

#[test]
fn old_agent_versions_rely_on_output_scanning() {
  let project = Project::new();
  let config = project.config("formula: nginx\nsalt_version: 0.17.5\n");

  let run = build_run_script(&config).unwrap();
  assert!(!run.contains("--retcode-passthrough"));
  assert!(run.contains("grep -e Result.*False"));
}

#[test]
fn highstate_can_be_disabled() {
  let project = Project::new();
  let config = project.config("formula: nginx\nsalt_run_highstate: false\n");

  assert!(build_run_script(&config).is_none());
}

#[cfg(unix)]
#[test]
#[serial(fake_salt_call)]
fn run_command_reports_failed_state_despite_zero_exit() {
  use std::os::unix::fs::PermissionsExt;

  let project = Project::new();
  let bin = project.dir.path().join("bin");
  std::fs::create_dir_all(&bin).unwrap();
  let salt_call = bin.join("salt-call");
  std::fs::write(
    &salt_call,
    "#!/bin/sh\necho '----------'\necho '          ID: nginx'\necho '      Result: False'\nexit 0\n",
  )
  .unwrap();
  std::fs::set_permissions(&salt_call, std::fs::Permissions::from_mode(0o755)).unwrap();

  let config = project.config("formula: nginx\nsudo: false\nsalt_version: 0.16.4\n");
  let run = build_run_script(&config).unwrap();

  let path = format!("{}:{}", bin.display(), std::env::var("PATH").unwrap_or_default());
  let output = Command::new("bash").arg("-c").arg(&run).env("PATH", path).output().unwrap();

  assert_eq!(output.status.code(), Some(1));
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("salt-call exit code: 0"));
  assert!(stdout.contains("salt-call output grep exit code 0"));
}
