//! Per-section validators.

use crate::schema::NovaConfig;

use super::helpers::{validate_endpoint_path, validate_http_url, validate_non_empty, validate_range};

pub(crate) fn validate_service(errors: &mut Vec<String>, config: &NovaConfig) {
    let service = &config.service;
    validate_http_url(errors, "service.base_url", &service.base_url);
    validate_endpoint_path(errors, "service.chat_path", &service.chat_path);
    validate_endpoint_path(errors, "service.chat_stream_path", &service.chat_stream_path);
    validate_endpoint_path(errors, "service.build_path", &service.build_path);
    validate_range(errors, "service.chat_timeout_secs", service.chat_timeout_secs, 1, 600);
    validate_range(errors, "service.build_timeout_secs", service.build_timeout_secs, 1, 3600);
}

pub(crate) fn validate_storage(errors: &mut Vec<String>, config: &NovaConfig) {
    validate_non_empty(errors, "storage.session_key", &config.storage.session_key);
}

pub(crate) fn validate_build(errors: &mut Vec<String>, config: &NovaConfig) {
    validate_non_empty(errors, "build.default_prompt", &config.build.default_prompt);
}
