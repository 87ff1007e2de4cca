// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the helpdesk configuration system.

use std::io::Write;

use helpdesk_config::diagnostic::ConfigError;
use helpdesk_config::model::HelpdeskConfig;
use helpdesk_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_helpdesk_config() {
    let toml = r#"
[bot]
name = "support-bot"
log_level = "debug"

[telegram]
bot_token = "123:ABC"
admin_chat_id = -1001234567890

[smtp]
host = "smtp.acme.com"
port = 465
username = "bot@acme.com"
password = "secret"
admin_email = "support@acme.com"

[imap]
enabled = true
host = "imap.acme.com"
poll_interval_secs = 120

[tracker]
token = "y0_token"
org_id = "42"
queue = "HELP"
poll_interval_secs = 10
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.name, "support-bot");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.telegram.admin_chat_id, -1001234567890);
    assert_eq!(config.smtp.host, "smtp.acme.com");
    assert_eq!(config.smtp.port, 465);
    assert_eq!(config.smtp.sender(), Some("bot@acme.com"));
    assert_eq!(config.smtp.recipient(), Some("support@acme.com"));
    assert!(config.imap.enabled);
    assert_eq!(config.imap.port, 993);
    assert_eq!(config.imap.poll_interval_secs, 120);
    assert_eq!(config.tracker.queue, "HELP");
    assert_eq!(config.tracker.org_id.as_deref(), Some("42"));
    assert_eq!(config.tracker.poll_interval_secs, 10);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.bot.name, "helpdesk");
    assert_eq!(config.bot.log_level, "info");
    assert!(config.telegram.bot_token.is_none());
    assert_eq!(config.telegram.admin_chat_id, 0);
    assert_eq!(config.smtp.host, "smtp.gmail.com");
    assert_eq!(config.smtp.port, 587);
    assert!(!config.imap.enabled);
    assert_eq!(config.imap.host, "imap.gmail.com");
    assert_eq!(config.imap.poll_interval_secs, 60);
    assert_eq!(config.tracker.base_url, "https://api.tracker.yandex.net/v2");
    assert_eq!(config.tracker.queue, "SUPPORT");
    assert_eq!(config.tracker.issue_type, "Обращение");
    assert_eq!(config.tracker.poll_interval_secs, 30);
}

/// Admin address falls back to the SMTP login when not set.
#[test]
fn smtp_recipient_falls_back_to_username() {
    let toml = r#"
[smtp]
username = "bot@acme.com"
"#;
    let config = load_config_from_str(toml).unwrap();
    assert_eq!(config.smtp.recipient(), Some("bot@acme.com"));
    assert_eq!(config.smtp.sender(), Some("bot@acme.com"));
}

/// Unknown field in [telegram] section produces an error.
#[test]
fn unknown_field_in_telegram_produces_error() {
    let toml = r#"
[telegram]
bot_tken = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("bot_tken"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unknown field becomes an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_field_diagnostic_suggests_correction() {
    let toml = r#"
[tracker]
queu = "HELP"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, suggestion: Some(s), .. } if key == "queu" && s == "queue"
    )));
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[anthropic]
api_key = "sk"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Wrong value type is reported.
#[test]
fn wrong_type_is_rejected() {
    let toml = r#"
[smtp]
port = "five-eight-seven"
"#;

    let errors = load_and_validate_str(toml).expect_err("string port should be rejected");
    assert!(!errors.is_empty());
}

/// Semantic validation runs after deserialization.
#[test]
fn validation_errors_surface_through_load() {
    let toml = r#"
[tracker]
poll_interval_secs = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("zero interval should fail");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { .. })));
}

/// Explicit dotted overrides win over TOML, as env vars do.
#[test]
fn dotted_override_wins_over_toml() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: HelpdeskConfig = Figment::new()
        .merge(Serialized::defaults(HelpdeskConfig::default()))
        .merge(Toml::string("[telegram]\nbot_token = \"from-toml\"\n"))
        .merge(("telegram.bot_token", "from-env"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.telegram.bot_token.as_deref(), Some("from-env"));
}

/// Loading from an explicit path reads the file.
#[test]
fn load_from_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[tracker]\nqueue = \"OPS\"").unwrap();

    let config = load_and_validate_path(file.path()).expect("file config should load");
    assert_eq!(config.tracker.queue, "OPS");
}
