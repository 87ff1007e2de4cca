// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes.
//! Presence of credentials is not checked here: `check` and `serve` report
//! missing tokens themselves so an empty config still loads.

use crate::diagnostic::ConfigError;
use crate::model::HelpdeskConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HelpdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.smtp.host.trim().is_empty() {
        errors.push(validation("smtp.host must not be empty"));
    }
    if config.smtp.port == 0 {
        errors.push(validation("smtp.port must not be 0"));
    }
    if config.imap.enabled && config.imap.port == 0 {
        errors.push(validation("imap.port must not be 0"));
    }
    if config.imap.poll_interval_secs == 0 {
        errors.push(validation("imap.poll_interval_secs must be at least 1"));
    }

    for (key, value) in [
        ("smtp.from", config.smtp.from.as_deref()),
        ("smtp.admin_email", config.smtp.admin_email.as_deref()),
    ] {
        if let Some(addr) = value
            && !addr.contains('@')
        {
            errors.push(validation(&format!(
                "{key} `{addr}` is not an email address"
            )));
        }
    }

    let base_url = config.tracker.base_url.trim();
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        errors.push(validation(&format!(
            "tracker.base_url `{base_url}` must start with http:// or https://"
        )));
    }
    if config.tracker.queue.trim().is_empty() {
        errors.push(validation("tracker.queue must not be empty"));
    }
    if config.tracker.poll_interval_secs == 0 {
        errors.push(validation("tracker.poll_interval_secs must be at least 1"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validation(message: &str) -> ConfigError {
    ConfigError::Validation {
        message: message.to_string(),
    }
}
