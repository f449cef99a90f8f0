//! CLI tests against a mock authentication service.
//!
//! The binary runs as a child process with the `SYMPHONY_*` environment
//! cleared, so only the flags given here take effect.

use std::process::{Command, Output};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENV_VARS: &[&str] = &[
    "SYMPHONY_SESSION_URL",
    "SYMPHONY_KEY_URL",
    "SYMPHONY_TRUSTSTORE",
    "SYMPHONY_TRUSTSTORE_PASSWORD",
    "SYMPHONY_KEYSTORE",
    "SYMPHONY_KEYSTORE_PASSWORD",
    "SYMPHONY_KEYSTORE_TYPE",
];

/// Run the CLI binary with arguments and a clean environment.
fn run_cli(args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_symauth"));
    cmd.args(args);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd.output().expect("Failed to execute CLI")
}

async fn mock_service() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sessionauth/v1/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "sessionToken",
            "token": "cli-session"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/keyauth/v1/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "keyManagerToken",
            "token": "cli-key"
        })))
        .mount(&server)
        .await;

    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_authenticate_prints_tokens() {
    let server = mock_service().await;
    let session_url = format!("{}/sessionauth", server.uri());
    let key_url = format!("{}/keyauth", server.uri());

    let output = run_cli(&[
        "authenticate",
        "--session-url",
        &session_url,
        "--key-url",
        &key_url,
    ]);

    assert!(
        output.status.success(),
        "authenticate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Authenticated successfully"));
    assert!(stdout.contains("Session: sessionToken cli-session"), "stdout: {stdout}");
    assert!(stdout.contains("Key manager: keyManagerToken cli-key"), "stdout: {stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_authenticate_json_output() {
    let server = mock_service().await;
    let session_url = format!("{}/sessionauth", server.uri());
    let key_url = format!("{}/keyauth", server.uri());

    let output = run_cli(&[
        "authenticate",
        "--session-url",
        &session_url,
        "--key-url",
        &key_url,
        "--json",
    ]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["sessionToken"]["name"], "sessionToken");
    assert_eq!(value["sessionToken"]["token"], "cli-session");
    assert_eq!(value["keyToken"]["name"], "keyManagerToken");
    assert_eq!(value["keyToken"]["token"], "cli-key");
}

#[test]
fn test_missing_key_url_fails() {
    let output = run_cli(&[
        "authenticate",
        "--session-url",
        "https://pod.example.com/sessionauth",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing configuration"), "stderr: {stderr}");
    assert!(stderr.starts_with("Authenticating..."), "stderr: {stderr}");
    assert!(stderr.contains("✗ Failed to authenticate"), "stderr: {stderr}");
    assert!(stderr.contains("caused by:"), "stderr: {stderr}");
}

#[test]
fn test_authenticate_with_pkcs12_fixture_reaches_service() {
    let fixtures = concat!(env!("CARGO_MANIFEST_DIR"), "/../symphony-auth/tests/fixtures");
    let output = run_cli(&[
        "authenticate",
        "--session-url",
        "http://127.0.0.1:1/sessionauth",
        "--key-url",
        "http://127.0.0.1:1/keyauth",
        "--truststore",
        &format!("{fixtures}/ca.pem"),
        "--keystore",
        &format!("{fixtures}/bot.p12"),
        "--keystore-password",
        "kpass",
    ]);

    // The key store loads, so the failure comes from the closed port
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("(transport)"), "stderr: {stderr}");
    assert!(!stderr.contains("kpass"));
}

#[test]
fn test_verbose_logs_resolved_stores() {
    let output = run_cli(&[
        "-vv",
        "authenticate",
        "--session-url",
        "https://pod.example.com/sessionauth",
        "--keystore",
        "/nonexistent/bot.p12",
        "--keystore-password",
        "key-secret",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Using TLS material"), "stderr: {stderr}");
    assert!(stderr.contains("https://pod.example.com/sessionauth"));
    assert!(stderr.contains("/nonexistent/bot.p12"));
    assert!(!stderr.contains("key-secret"));
}

#[test]
fn test_version_flag() {
    let output = run_cli(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_bad_keystore_hides_password() {
    let output = run_cli(&[
        "authenticate",
        "--session-url",
        "https://pod.example.com/sessionauth",
        "--key-url",
        "https://km.example.com/keyauth",
        "--truststore",
        "/nonexistent/trust.pem",
        "--truststore-password",
        "trust-secret",
        "--keystore",
        "/nonexistent/bot.pem",
        "--keystore-password",
        "key-secret",
        "--keystore-type",
        "pem",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/nonexistent/trust.pem"), "stderr: {stderr}");
    assert!(stderr.contains("/nonexistent/bot.pem"), "stderr: {stderr}");
    assert!(!stderr.contains("trust-secret"));
    assert!(!stderr.contains("key-secret"));
}

#[test]
fn test_show_config_redacts_passwords() {
    let output = run_cli(&[
        "show-config",
        "--session-url",
        "https://pod.example.com/sessionauth",
        "--keystore",
        "/certs/bot.p12",
        "--keystore-password",
        "key-secret",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("https://pod.example.com/sessionauth"));
    assert!(stdout.contains("/certs/bot.p12"));
    assert!(stdout.contains("pkcs12"));
    assert!(stdout.contains("[REDACTED]"));
    assert!(!stdout.contains("key-secret"));
}

#[test]
fn test_unknown_keystore_type_rejected() {
    let output = run_cli(&[
        "show-config",
        "--keystore",
        "/certs/bot.jks",
        "--keystore-type",
        "jks",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("jks"));
}
