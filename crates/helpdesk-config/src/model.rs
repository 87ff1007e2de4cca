// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the helpdesk intake bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level helpdesk configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HelpdeskConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Outgoing mail to the administrators.
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Administrator reply mailbox.
    #[serde(default)]
    pub imap: ImapConfig,

    /// Yandex Tracker integration.
    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name used in logs.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "helpdesk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required by `serve`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Group chat that receives new requests. `0` means unset.
    #[serde(default)]
    pub admin_chat_id: i64,
}

/// SMTP configuration for notifying administrators.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,

    /// 465 selects implicit TLS, anything else STARTTLS.
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Sender address. Defaults to `username`.
    #[serde(default)]
    pub from: Option<String>,

    /// Recipient of new requests. Defaults to `username`.
    #[serde(default)]
    pub admin_email: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: None,
            password: None,
            from: None,
            admin_email: None,
        }
    }
}

impl SmtpConfig {
    /// Effective sender address.
    pub fn sender(&self) -> Option<&str> {
        self.from.as_deref().or(self.username.as_deref())
    }

    /// Effective administrator address.
    pub fn recipient(&self) -> Option<&str> {
        self.admin_email.as_deref().or(self.username.as_deref())
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

/// IMAP configuration for relaying administrator replies.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImapConfig {
    /// Whether the reply listener runs at all.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_imap_host")]
    pub host: String,

    #[serde(default = "default_imap_port")]
    pub port: u16,

    /// Defaults to `smtp.username`.
    #[serde(default)]
    pub username: Option<String>,

    /// Defaults to `smtp.password`.
    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_imap_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for ImapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_imap_host(),
            port: default_imap_port(),
            username: None,
            password: None,
            poll_interval_secs: default_imap_poll_interval(),
        }
    }
}

fn default_imap_host() -> String {
    "imap.gmail.com".to_string()
}

fn default_imap_port() -> u16 {
    993
}

fn default_imap_poll_interval() -> u64 {
    60
}

/// Yandex Tracker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// OAuth token. Required by `serve`.
    #[serde(default)]
    pub token: Option<String>,

    /// Organization id sent as `X-Org-ID`.
    #[serde(default)]
    pub org_id: Option<String>,

    #[serde(default = "default_tracker_base_url")]
    pub base_url: String,

    /// Queue new issues are opened in.
    #[serde(default = "default_queue")]
    pub queue: String,

    /// Issue type name.
    #[serde(default = "default_issue_type")]
    pub issue_type: String,

    /// How often open issues are checked for new comments.
    #[serde(default = "default_tracker_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            token: None,
            org_id: None,
            base_url: default_tracker_base_url(),
            queue: default_queue(),
            issue_type: default_issue_type(),
            poll_interval_secs: default_tracker_poll_interval(),
        }
    }
}

fn default_tracker_base_url() -> String {
    "https://api.tracker.yandex.net/v2".to_string()
}

fn default_queue() -> String {
    "SUPPORT".to_string()
}

fn default_issue_type() -> String {
    "Обращение".to_string()
}

fn default_tracker_poll_interval() -> u64 {
    30
}
