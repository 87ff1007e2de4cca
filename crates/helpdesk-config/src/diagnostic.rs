// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns Figment errors into miette diagnostics for `helpdesk.toml`.
//!
//! Unknown keys are checked against the sections the bot understands and get
//! a "did you mean?" hint (Jaro-Winkler) plus the list of keys that section
//! accepts.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// Catches `bot_tken` -> `bot_token` and `admin_chat` -> `admin_chat_id`.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Every table of `helpdesk.toml` with the keys it accepts.
pub const SECTIONS: &[(&str, &[&str])] = &[
    ("bot", &["name", "log_level"]),
    ("telegram", &["bot_token", "admin_chat_id"]),
    (
        "smtp",
        &["host", "port", "username", "password", "from", "admin_email"],
    ),
    (
        "imap",
        &["enabled", "host", "port", "username", "password", "poll_interval_secs"],
    ),
    (
        "tracker",
        &["token", "org_id", "base_url", "queue", "issue_type", "poll_interval_secs"],
    ),
];

/// Keys accepted under `[section]`, or the section names themselves for the
/// top level.
pub fn section_keys(section: Option<&str>) -> Option<Vec<&'static str>> {
    match section {
        None => Some(SECTIONS.iter().map(|(name, _)| *name).collect()),
        Some(section) => SECTIONS
            .iter()
            .find(|(name, _)| *name == section)
            .map(|(_, keys)| keys.to_vec()),
    }
}

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}` in {}", section_label(.section.as_deref()))]
    #[diagnostic(
        code(helpdesk::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Enclosing table; `None` for a stray top-level table or key.
        section: Option<String>,
        suggestion: Option<String>,
        valid_keys: String,
    },

    #[error("invalid type for `{key}`: {detail}")]
    #[diagnostic(code(helpdesk::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(helpdesk::config::missing_key),
        help("add `{key} = <value>` to your helpdesk.toml")
    )]
    MissingKey { key: String },

    /// A value that parsed but makes no sense, e.g. `tracker.queue = ""`.
    #[error("validation error: {message}")]
    #[diagnostic(code(helpdesk::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(helpdesk::config::other))]
    Other(String),
}

fn section_label(section: Option<&str>) -> String {
    match section {
        Some(s) => format!("[{s}]"),
        None => "the top level".to_string(),
    }
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into
/// `ConfigError`s.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let path: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    // Figment may or may not include the offending key in the path.
                    let section = path.iter().find(|p| *p != field).cloned();
                    let valid = section_keys(section.as_deref())
                        .unwrap_or_else(|| expected.to_vec());
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: suggest_key(field, &valid),
                        valid_keys: valid.join(", "),
                        section,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: dotted(&path, field),
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: path.join("."),
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

fn dotted(path: &[String], field: &str) -> String {
    match path.first() {
        Some(section) if section != field => format!("{section}.{field}"),
        _ => field.to_string(),
    }
}

/// Best match above the similarity threshold, if any.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unknown_key(toml: &str) -> ConfigError {
        let errors = crate::load_and_validate_str(toml).expect_err("unknown key accepted");
        errors
            .into_iter()
            .find(|e| matches!(e, ConfigError::UnknownKey { .. }))
            .expect("no unknown key diagnostic")
    }

    #[test]
    fn suggest_hots_for_host() {
        let valid = section_keys(Some("smtp")).unwrap();
        assert_eq!(suggest_key("hots", &valid), Some("host".to_string()));
    }

    #[test]
    fn suggest_admin_chat_for_admin_chat_id() {
        let valid = section_keys(Some("telegram")).unwrap();
        assert_eq!(
            suggest_key("admin_chat", &valid),
            Some("admin_chat_id".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = section_keys(Some("tracker")).unwrap();
        assert_eq!(suggest_key("zzzzzz", &valid), None);
    }

    #[test]
    fn unknown_section_has_no_keys() {
        assert!(section_keys(Some("anthropic")).is_none());
        assert_eq!(
            section_keys(None).unwrap(),
            ["bot", "telegram", "smtp", "imap", "tracker"]
        );
    }

    #[test]
    fn section_table_matches_model() {
        for (section, keys) in SECTIONS {
            let err = unknown_key(&format!("[{section}]\nnot_a_key = 1\n"));
            let ConfigError::UnknownKey {
                section: found,
                valid_keys,
                ..
            } = err
            else {
                unreachable!();
            };
            assert_eq!(found.as_deref(), Some(*section));
            assert_eq!(valid_keys, keys.join(", "), "keys of [{section}]");
        }
    }

    #[test]
    fn imap_typo_names_section_and_suggests() {
        let err = unknown_key("[imap]\npoll_interval = 30\n");
        assert_eq!(
            err.to_string(),
            "unknown configuration key `poll_interval` in [imap]"
        );
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.starts_with("did you mean `poll_interval_secs`?"), "got: {help}");
        assert!(help.contains("enabled, host, port"), "got: {help}");
    }

    #[test]
    fn stray_top_level_table_lists_sections() {
        let err = unknown_key("[trakcer]\nqueue = \"HELP\"\n");
        let ConfigError::UnknownKey {
            section,
            suggestion,
            valid_keys,
            ..
        } = err
        else {
            unreachable!();
        };
        assert_eq!(section, None);
        assert_eq!(suggestion.as_deref(), Some("tracker"));
        assert_eq!(valid_keys, "bot, telegram, smtp, imap, tracker");
    }
}
