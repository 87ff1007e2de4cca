// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `helpdesk serve` command implementation.
//!
//! Wires Telegram, SMTP and the tracker into the intake loop, then runs the
//! reply poller and (when enabled) the email reply listener next to it until
//! a shutdown signal arrives.

use std::sync::Arc;
use std::time::Duration;

use helpdesk_agent::delivery::Delivery;
use helpdesk_agent::poller::ReplyPoller;
use helpdesk_agent::router::FormRouter;
use helpdesk_agent::store::SessionStore;
use helpdesk_agent::watch::WatchRegistry;
use helpdesk_agent::{IntakeLoop, shutdown};
use helpdesk_config::HelpdeskConfig;
use helpdesk_core::error::HelpdeskError;
use helpdesk_core::types::ChatId;
use helpdesk_core::{ChannelAdapter, MailTransport, PluginAdapter, TrackerAdapter};
use helpdesk_email::{ReplyListener, SmtpMailer};
use helpdesk_telegram::TelegramChannel;
use helpdesk_tracker::YandexTracker;
use tracing::{info, warn};

/// Runs the `helpdesk serve` command.
pub async fn run_serve(config: HelpdeskConfig) -> Result<(), HelpdeskError> {
    init_tracing(&config.bot.log_level);

    info!(name = config.bot.name.as_str(), "starting helpdesk serve");

    let mut telegram = TelegramChannel::new(&config.telegram)?;
    telegram.connect().await?;
    let channel: Arc<dyn ChannelAdapter> = Arc::new(telegram);

    let mailer: Arc<dyn MailTransport> = Arc::new(SmtpMailer::new(&config.smtp)?);
    let tracker: Arc<dyn TrackerAdapter> = Arc::new(YandexTracker::new(&config.tracker)?);

    let admin_chat = admin_chat(config.telegram.admin_chat_id);
    if admin_chat.is_none() {
        warn!("telegram.admin_chat_id is not set, requests will only be emailed");
    }

    let store = Arc::new(SessionStore::new());
    let watches = Arc::new(WatchRegistry::new());
    let delivery = Delivery::new(channel.clone(), mailer.clone(), tracker.clone(), admin_chat);
    let router = FormRouter::new(channel.clone(), store.clone(), watches.clone(), delivery);
    let intake = IntakeLoop::new(channel.clone(), router);

    let cancel = shutdown::install_signal_handler();

    let poller = ReplyPoller::new(
        tracker.clone(),
        channel.clone(),
        store.clone(),
        watches.clone(),
        Duration::from_secs(config.tracker.poll_interval_secs.max(1)),
    );
    let mut tasks = vec![tokio::spawn(poller.run(cancel.clone()))];

    if config.imap.enabled {
        let listener = ReplyListener::new(&config.imap, &config.smtp, channel.clone())?;
        tasks.push(tokio::spawn(listener.run(cancel.clone())));
    } else {
        info!("email reply listener disabled");
    }

    intake.run(cancel.clone()).await?;

    // The intake loop also stops when the channel closes.
    cancel.cancel();
    for task in tasks {
        if let Err(e) = task.await {
            warn!(error = %e, "background task ended abnormally");
        }
    }

    shutdown_adapter(channel.as_ref()).await;
    shutdown_adapter(mailer.as_ref()).await;
    shutdown_adapter(tracker.as_ref()).await;

    info!("helpdesk serve stopped");
    Ok(())
}

/// `0` means no administrator chat.
fn admin_chat(id: i64) -> Option<ChatId> {
    (id != 0).then_some(ChatId(id))
}

async fn shutdown_adapter<A: PluginAdapter + ?Sized>(adapter: &A) {
    if let Err(e) = adapter.shutdown().await {
        warn!(adapter = adapter.name(), error = %e, "adapter shutdown failed");
    }
}

/// Initializes the tracing subscriber with the configured log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("helpdesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
