//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    let config = NovaConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn accepts_https_base_url_with_prefix() {
    let mut config = NovaConfig::default();
    config.service.base_url = "https://widgets.example.com/nova".into();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_non_http_base_url() {
    let mut config = NovaConfig::default();
    config.service.base_url = "ftp://example.com".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("service.base_url"));
}

#[test]
fn catches_relative_endpoint_path() {
    let mut config = NovaConfig::default();
    config.service.chat_path = "api/chat".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("service.chat_path"));
}

#[test]
fn catches_zero_timeout() {
    let mut config = NovaConfig::default();
    config.service.chat_timeout_secs = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("service.chat_timeout_secs"));
}

#[test]
fn catches_build_timeout_too_large() {
    let mut config = NovaConfig::default();
    config.service.build_timeout_secs = 7200;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("service.build_timeout_secs"));
}

#[test]
fn catches_blank_session_key() {
    let mut config = NovaConfig::default();
    config.storage.session_key = "  ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("storage.session_key"));
}

#[test]
fn catches_empty_default_prompt() {
    let mut config = NovaConfig::default();
    config.build.default_prompt = String::new();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("build.default_prompt"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = NovaConfig::default();
    config.service.build_path = "build".into();
    config.storage.session_key = String::new();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("service.build_path"));
    assert!(err.contains("storage.session_key"));
    assert!(err.contains("; "));
}
