use assert_cmd::Command;
use base64::{engine::general_purpose::STANDARD, Engine};
use predicates::prelude::*;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LITERALS: &str = r#"
vars:
  FOO: bar
environments:
  dev:
    vars:
      ENV: dev
    dcs:
      east:
        vars:
          DC: east
"#;

const WITH_SECRETS: &str = r#"
vars:
  FOO: bar
secrets:
  API_TOKEN: kv/api
kv_secrets:
  - path: kv/db
    vars:
      DB_PASS: password
"#;

fn write_variables(tmp: &TempDir, contents: &str) -> PathBuf {
    let path = tmp.path().join("variables.yml");
    fs::write(&path, contents).unwrap();
    path
}

/// The binary with a clean environment rooted in `tmp`
fn buildenv(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("buildenv").unwrap();
    cmd.current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("VAULT_ADDR", "http://127.0.0.1:1")
        .env("VAULT_TOKEN", "s.test")
        .env_remove("ENVIRONMENT")
        .env_remove("DATACENTER")
        .env_remove("VARIABLES_FILE")
        .env_remove("VAULT_NAMESPACE")
        .env_remove("VAULT_CLIENT_TIMEOUT")
        .env_remove("BUILDENV_LOG");
    cmd
}

#[test]
fn test_help() {
    let tmp = TempDir::new().unwrap();
    buildenv(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--skip-vault"));
}

#[test]
fn test_prints_exports_for_all_scopes() {
    let tmp = TempDir::new().unwrap();
    write_variables(&tmp, LITERALS);

    buildenv(&tmp)
        .args(["-e", "dev", "-d", "east"])
        .assert()
        .success()
        .stdout("export FOO=\"bar\"\nexport ENV=\"dev\"\nexport DC=\"east\"\n");
}

#[test]
fn test_comments() {
    let tmp = TempDir::new().unwrap();
    write_variables(&tmp, LITERALS);

    buildenv(&tmp)
        .args(["-c", "-e", "dev"])
        .assert()
        .success()
        .stdout(
            "# Global Variables\nexport FOO=\"bar\"\n# Environment: dev\nexport ENV=\"dev\"\n",
        );
}

#[test]
fn test_environment_from_env_var() {
    let tmp = TempDir::new().unwrap();
    write_variables(&tmp, LITERALS);

    buildenv(&tmp)
        .env("ENVIRONMENT", "dev")
        .assert()
        .success()
        .stdout(predicate::str::contains("export ENV=\"dev\""));
}

#[test]
fn test_datacenter_without_environment() {
    let tmp = TempDir::new().unwrap();
    write_variables(&tmp, LITERALS);

    buildenv(&tmp)
        .args(["-d", "east"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires an environment"));
}

#[test]
fn test_missing_variables_file() {
    let tmp = TempDir::new().unwrap();

    buildenv(&tmp)
        .args(["-f", "missing.yml"])
        .assert()
        .code(4);
}

#[test]
fn test_invalid_yaml() {
    let tmp = TempDir::new().unwrap();
    write_variables(&tmp, "vars: [1, 2]\n");

    buildenv(&tmp).assert().code(5);
}

#[test]
fn test_skip_vault_never_contacts_store() {
    let tmp = TempDir::new().unwrap();
    write_variables(&tmp, WITH_SECRETS);

    buildenv(&tmp)
        .arg("--skip-vault")
        .assert()
        .success()
        .stdout("export FOO=\"bar\"\n");
}

#[test]
fn test_unreachable_store() {
    let tmp = TempDir::new().unwrap();
    write_variables(&tmp, WITH_SECRETS);

    buildenv(&tmp)
        .assert()
        .code(6)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_base64_json() {
    let tmp = TempDir::new().unwrap();
    write_variables(&tmp, LITERALS);

    let output = buildenv(&tmp)
        .args(["-b", "-e", "dev"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = STANDARD
        .decode(String::from_utf8(output).unwrap().trim())
        .unwrap();
    let vars: HashMap<String, String> = serde_json::from_slice(&json).unwrap();
    assert_eq!(vars.len(), 2);
    assert_eq!(vars["ENV"], "dev");
}

#[test]
fn test_run_forwards_exit_code() {
    let tmp = TempDir::new().unwrap();
    write_variables(&tmp, LITERALS);

    buildenv(&tmp)
        .env("SHELL", "/bin/sh")
        .args(["-e", "dev", "-r", "test \"$FOO-$ENV\" = bar-dev && exit 7"])
        .assert()
        .code(7);
}

#[test]
fn test_settings_file_defaults() {
    let tmp = TempDir::new().unwrap();
    write_variables(&tmp, LITERALS);
    fs::write(
        tmp.path().join(".buildenv.yaml"),
        "environment: dev\ncomments: true\n",
    )
    .unwrap();

    buildenv(&tmp)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Environment: dev"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resolves_secrets_from_vault() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/sys/mounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "kv/": { "type": "kv", "options": { "version": "2" } } }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/kv/data/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "data": { "value": "t0k3n" } }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/kv/data/db"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "data": { "password": "p$ss" } }
        })))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    write_variables(&tmp, WITH_SECRETS);

    buildenv(&tmp)
        .env("VAULT_ADDR", server.uri())
        .arg("-c")
        .assert()
        .success()
        .stdout(
            "# Global Variables\n\
             export FOO=\"bar\"\n\
             export API_TOKEN=\"t0k3n\" # Path: kv/api, Key: value\n\
             export DB_PASS=\"p\\$ss\" # Path: kv/db, Key: password\n",
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_secret_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/sys/mounts"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "errors": ["permission denied"] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/kv/data/api"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    write_variables(&tmp, WITH_SECRETS);

    buildenv(&tmp)
        .env("VAULT_ADDR", server.uri())
        .assert()
        .code(7)
        .stderr(predicate::str::contains("secret does not exist: 'kv/api'"));
}
