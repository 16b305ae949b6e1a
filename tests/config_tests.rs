// Configuration loading tests
// Author: kelexine (https://github.com/kelexine)

use appointment_parser::config::{ApiKey, AppConfig};
use std::io::Write;

#[test]
fn test_defaults() {
    let config = AppConfig::default();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.gemini.model, "gemini-2.5-flash");
    assert_eq!(config.gemini.temperature, 0.0);
    assert_eq!(config.gemini.response_mime_type, "application/json");
    assert!(config.gemini.timeout_seconds.is_none());
    assert_eq!(config.scheduling.timezone, "Asia/Kolkata");
    assert_eq!(config.limits.max_image_bytes, 20 * 1024 * 1024);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[server]
port = 9100

[gemini]
model = "gemini-2.5-pro"
api_key = "file-key"
timeout_seconds = 30

[scheduling]
timezone = "Europe/Berlin"
"#
    )
    .unwrap();

    let config = AppConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.gemini.model, "gemini-2.5-pro");
    assert_eq!(config.gemini.api_key, Some(ApiKey::new("file-key")));
    assert_eq!(config.gemini.timeout_seconds, Some(30));
    assert_eq!(config.scheduling.timezone, "Europe/Berlin");
}

#[test]
fn test_missing_explicit_file_is_error() {
    let result = AppConfig::load(Some(std::path::Path::new("/nonexistent/appointment.toml")));
    assert!(result.is_err());
}

#[test]
fn test_api_key_fallback() {
    let mut config = AppConfig::default();
    config.apply_api_key_fallback(Some("env-key".to_string()));
    assert_eq!(config.gemini.api_key, Some(ApiKey::new("env-key")));

    // A configured key wins over the fallback
    config.apply_api_key_fallback(Some("other-key".to_string()));
    assert_eq!(config.gemini.api_key, Some(ApiKey::new("env-key")));

    let mut config = AppConfig::default();
    config.apply_api_key_fallback(Some("  ".to_string()));
    assert!(config.gemini.api_key.is_none());
}
