use ledger_exec::{AccountId, ClientBuilder, ClientConfig, Error, Hbar};
use std::io::Write;
use std::time::Duration;

fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("ledger-")
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_yaml_by_extension() {
    let file = write_config(
        ".yaml",
        r#"
network:
  "0.0.3": "http://127.0.0.1:50211"
  "0.0.4": "http://127.0.0.1:50212"
  "0.0.5": "http://127.0.0.1:50213"
operator_account_id: "0.0.2"
max_query_payment: 200000000
attempt_timeout_ms: 1500
"#,
    );
    let cfg = ClientConfig::from_file(file.path()).unwrap();
    assert_eq!(cfg.network.len(), 3);
    assert_eq!(
        cfg.network.keys().next().copied(),
        Some(AccountId::new(0, 0, 3))
    );
    assert_eq!(cfg.max_query_payment, Some(Hbar::new(2)));
    assert_eq!(cfg.attempt_timeout_ms, Some(1500));
}

#[test]
fn loads_json_by_extension() {
    let file = write_config(
        ".json",
        r#"{"network": {"0.0.3": "https://node.example:443"}, "max_attempts": 3}"#,
    );
    let cfg = ClientConfig::from_file(file.path()).unwrap();
    assert_eq!(cfg.max_attempts, Some(3));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ClientConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn invalid_address_is_rejected_at_build() {
    let file = write_config(".yaml", "network:\n  \"0.0.3\": \"::not a url::\"\n");
    let cfg = ClientConfig::from_file(file.path()).unwrap();
    let err = ClientBuilder::from_config(&cfg).build().unwrap_err();
    assert!(err.is_local());
    assert!(err.to_string().contains("invalid node address"));
}

#[test]
fn env_overrides_apply_when_unset_in_builder() {
    let file = write_config(".yaml", "network:\n  \"0.0.3\": \"http://127.0.0.1:50211\"\n");
    let cfg = ClientConfig::from_file(file.path()).unwrap();

    std::env::set_var("LEDGER_MAX_ATTEMPTS", "4");
    std::env::set_var("LEDGER_REQUEST_TIMEOUT_SECS", "7");
    let from_env = ClientBuilder::from_config(&cfg).build().unwrap();
    let explicit = ClientBuilder::from_config(&cfg)
        .max_attempts(2)
        .request_timeout(None)
        .build()
        .unwrap();
    std::env::remove_var("LEDGER_MAX_ATTEMPTS");
    std::env::remove_var("LEDGER_REQUEST_TIMEOUT_SECS");

    assert_eq!(from_env.retry_policy().max_attempts, 4);
    assert_eq!(from_env.request_timeout(), Some(Duration::from_secs(7)));
    assert_eq!(explicit.retry_policy().max_attempts, 2);
    assert_eq!(explicit.request_timeout(), None);
}
