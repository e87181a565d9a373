//! `saltsolo sandbox` integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

const FORMULA_CONFIG: &str = r#"
provisioner:
  name: salt_solo
  formula: nginx
  state_top:
    base:
      '*':
        - nginx
  pillars:
    nginx.sls:
      nginx:
        port: 80
"#;

fn formula_env() -> TestEnv {
  let env = TestEnv::new(FORMULA_CONFIG);
  env.write_file("nginx/init.sls", "nginx:\n  pkg.installed: []\n");
  env
}

#[test]
fn builds_into_requested_directory() {
  let env = formula_env();
  let sandbox = env.path("out");

  env
    .saltsolo_cmd()
    .arg("sandbox")
    .arg("--sandbox")
    .arg(&sandbox)
    .assert()
    .success()
    .stdout(predicate::str::contains("Sandbox ready"))
    .stdout(predicate::str::contains("Artifacts: 3"))
    .stderr(predicate::str::contains("preparing formula"));

  assert!(sandbox.join("etc/salt/minion").is_file());
  assert!(sandbox.join("srv/salt/top.sls").is_file());
  assert!(sandbox.join("srv/pillar/nginx.sls").is_file());
  assert!(sandbox.join("srv/salt/nginx/init.sls").is_file());
}

#[test]
fn json_report_lists_artifacts_and_digest() {
  let env = formula_env();
  let sandbox = env.path("out");

  let output = env
    .saltsolo_cmd()
    .arg("sandbox")
    .arg("--sandbox")
    .arg(&sandbox)
    .arg("--json")
    .output()
    .unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["digest"].as_str().unwrap().len(), 64);
  let artifacts: Vec<&str> = report["artifacts"]
    .as_array()
    .unwrap()
    .iter()
    .map(|a| a.as_str().unwrap())
    .collect();
  assert_eq!(artifacts, ["etc/salt/minion", "srv/salt/top.sls", "srv/pillar/nginx.sls"]);
  assert_eq!(report["copies"][0]["destination"], "srv/salt/nginx");
}

#[test]
fn identical_inputs_give_identical_digests() {
  let env = formula_env();

  let digest = |dir: &str| {
    let output = env
      .saltsolo_cmd()
      .args(["sandbox", "--json", "--sandbox"])
      .arg(env.path(dir))
      .output()
      .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    report["digest"].as_str().unwrap().to_string()
  };

  assert_eq!(digest("first"), digest("second"));
}

#[test]
fn defaults_to_a_kept_temporary_directory() {
  let env = formula_env();

  let output = env.saltsolo_cmd().args(["sandbox", "--json"]).output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let root = std::path::PathBuf::from(report["root"].as_str().unwrap());
  assert!(root.join("etc/salt/minion").is_file());
  assert!(root.file_name().unwrap().to_string_lossy().starts_with("saltsolo-sandbox-"));

  std::fs::remove_dir_all(root).unwrap();
}

#[test]
fn non_empty_sandbox_is_rejected() {
  let env = formula_env();
  env.write_file("out/stale.txt", "old");

  env
    .saltsolo_cmd()
    .args(["sandbox", "--sandbox", "out"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("is not empty"));
}

#[test]
fn broken_pillar_file_fails_the_build() {
  let env = TestEnv::new("formula: nginx\npillars-from-files:\n  users.sls: users.yml\n");
  env.write_file("nginx/init.sls", "nginx: {}\n");
  env.write_file("users.yml", "users: [alice\n");

  env
    .saltsolo_cmd()
    .args(["sandbox", "--sandbox", "out"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to parse pillar file"));
}

#[test]
fn missing_formula_fails_the_build() {
  let env = TestEnv::new("salt_version: latest\n");

  env
    .saltsolo_cmd()
    .args(["sandbox", "--sandbox", "out"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("`formula` must be set"));
}
