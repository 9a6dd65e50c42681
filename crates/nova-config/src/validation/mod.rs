//! Full configuration validation.
//!
//! Each section has its own check; all errors are collected into a single
//! `ConfigError`.

mod helpers;
mod sections;

#[cfg(test)]
mod tests;

use crate::schema::NovaConfig;
use nova_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &NovaConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    sections::validate_service(&mut errors, config);
    sections::validate_storage(&mut errors, config);
    sections::validate_build(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
