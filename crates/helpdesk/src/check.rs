// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `helpdesk check` command implementation.
//!
//! Builds each collaborator from the loaded configuration and runs its
//! health check, so misconfiguration shows up before `serve` is started.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use helpdesk_config::HelpdeskConfig;
use helpdesk_core::error::HelpdeskError;
use helpdesk_core::{HealthStatus, PluginAdapter};
use helpdesk_email::SmtpMailer;
use helpdesk_telegram::TelegramChannel;
use helpdesk_tracker::YandexTracker;

const CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Runs the `helpdesk check` command.
///
/// Fails when any check fails; warnings alone do not.
pub async fn run_check(config: &HelpdeskConfig, plain: bool) -> Result<(), HelpdeskError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let results = vec![
        check_adapter("Telegram", TelegramChannel::new(&config.telegram)).await,
        check_admin_chat(config),
        check_adapter("SMTP", SmtpMailer::new(&config.smtp)).await,
        check_imap(config),
        check_adapter("Tracker", YandexTracker::new(&config.tracker)).await,
    ];

    println!();
    println!("  helpdesk check");
    println!("  {}", "-".repeat(50));

    for result in &results {
        println!("{}", render_line(result, use_color));
    }
    println!();

    let fail_count = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    let warn_count = results
        .iter()
        .filter(|r| r.status == CheckStatus::Warn)
        .count();

    if fail_count + warn_count == 0 {
        println!("  All checks passed.");
    } else {
        let issues = fail_count + warn_count;
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    }
    println!();

    if fail_count > 0 {
        return Err(HelpdeskError::Internal(format!(
            "{fail_count} check(s) failed"
        )));
    }
    Ok(())
}

/// Constructs an adapter and runs its health check under a timeout.
async fn check_adapter<A: PluginAdapter>(name: &str, adapter: Result<A, HelpdeskError>) -> CheckResult {
    let start = Instant::now();
    let adapter = match adapter {
        Ok(adapter) => adapter,
        Err(e) => return CheckResult::new(name, CheckStatus::Fail, e.to_string(), start),
    };

    match tokio::time::timeout(CHECK_TIMEOUT, adapter.health_check()).await {
        Ok(Ok(status)) => {
            let (status, message) = from_health(status);
            CheckResult::new(name, status, message, start)
        }
        Ok(Err(e)) => CheckResult::new(name, CheckStatus::Fail, e.to_string(), start),
        Err(_) => CheckResult::new(
            name,
            CheckStatus::Fail,
            format!("timeout ({}s)", CHECK_TIMEOUT.as_secs()),
            start,
        ),
    }
}

fn from_health(status: HealthStatus) -> (CheckStatus, String) {
    match status {
        HealthStatus::Healthy => (CheckStatus::Pass, "reachable".to_string()),
        HealthStatus::Degraded(reason) => (CheckStatus::Warn, reason),
        HealthStatus::Unhealthy(reason) => (CheckStatus::Fail, reason),
    }
}

fn check_admin_chat(config: &HelpdeskConfig) -> CheckResult {
    let start = Instant::now();
    match config.telegram.admin_chat_id {
        0 => CheckResult::new(
            "Admin chat",
            CheckStatus::Warn,
            "not set, chat notifications disabled",
            start,
        ),
        id => CheckResult::new("Admin chat", CheckStatus::Pass, id.to_string(), start),
    }
}

/// The listener logs in on every cycle, so only its settings are checked here.
fn check_imap(config: &HelpdeskConfig) -> CheckResult {
    let start = Instant::now();
    if !config.imap.enabled {
        return CheckResult::new("IMAP", CheckStatus::Warn, "disabled", start);
    }
    let has_user = config.imap.username.is_some() || config.smtp.username.is_some();
    let has_password = config.imap.password.is_some() || config.smtp.password.is_some();
    if has_user && has_password {
        CheckResult::new(
            "IMAP",
            CheckStatus::Pass,
            format!("{}:{}", config.imap.host, config.imap.port),
            start,
        )
    } else {
        CheckResult::new("IMAP", CheckStatus::Fail, "credentials missing", start)
    }
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!(
            "    {symbol} {:<20} {message} ({duration_ms}ms)",
            result.name
        )
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}
