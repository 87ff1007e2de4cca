// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the helpdesk intake bot.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide,
//! providing long polling, inline keyboards, HTML formatting and file
//! transfer.

pub mod handler;
pub mod media;

use async_trait::async_trait;
use helpdesk_config::model::TelegramConfig;
use helpdesk_core::error::HelpdeskError;
use helpdesk_core::markup::strip_html;
use helpdesk_core::traits::{ChannelAdapter, PluginAdapter};
use helpdesk_core::types::{
    AdapterType, AttachmentRef, Button, ChatId, HealthStatus, InboundEvent, MessageId,
    OutboundMessage, TextFormat,
};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram channel adapter implementing [`ChannelAdapter`].
///
/// Connects to Telegram via long polling and forwards private-chat messages
/// and button presses to the intake loop.
pub struct TelegramChannel {
    bot: Bot,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, HelpdeskError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            HelpdeskError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.is_empty() {
            return Err(HelpdeskError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
    teloxide::types::ChatId(chat_id.0)
}

fn keyboard(buttons: &[Button]) -> InlineKeyboardMarkup {
    let row = buttons
        .iter()
        .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()))
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(vec![row])
}

fn send_error(e: teloxide::RequestError) -> HelpdeskError {
    HelpdeskError::Channel {
        message: format!("failed to send message: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), HelpdeskError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let bot = self.bot.clone();
        let msg_tx = self.inbound_tx.clone();
        let cb_tx = self.inbound_tx.clone();

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let messages = Update::filter_message().endpoint(move |msg: Message| {
                let tx = msg_tx.clone();
                async move {
                    if !handler::is_dm(&msg) {
                        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                        return respond(());
                    }

                    match handler::extract_content(&msg) {
                        Some(content) => {
                            let event = handler::to_inbound_event(&msg, content);
                            if tx.send(event).await.is_err() {
                                warn!("inbound channel closed, dropping message");
                            }
                        }
                        None => {
                            debug!(msg_id = msg.id.0, "ignoring unsupported message type");
                        }
                    }

                    respond(())
                }
            });

            let callbacks =
                Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                    let tx = cb_tx.clone();
                    async move {
                        // Stops the client-side spinner; the reply comes as a new message.
                        if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                            warn!(error = %e, "failed to answer callback query");
                        }
                        if let Some(event) = handler::callback_to_event(&q) {
                            if tx.send(event).await.is_err() {
                                warn!("inbound channel closed, dropping callback");
                            }
                        }
                        respond(())
                    }
                });

            let handler = dptree::entry().branch(messages).branch(callbacks);

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {})
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, HelpdeskError> {
        let chat_id = tg_chat(msg.chat_id);

        let mut request = self.bot.send_message(chat_id, &msg.content);
        if msg.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if !msg.buttons.is_empty() {
            request = request.reply_markup(keyboard(&msg.buttons));
        }

        let sent = match request.await {
            Ok(sent) => sent,
            Err(e) if msg.format == TextFormat::Html => {
                warn!(error = %e, "HTML send failed, sending as plain text");
                let mut plain = self.bot.send_message(chat_id, strip_html(&msg.content));
                if !msg.buttons.is_empty() {
                    plain = plain.reply_markup(keyboard(&msg.buttons));
                }
                plain.await.map_err(send_error)?
            }
            Err(e) => return Err(send_error(e)),
        };

        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn send_attachment(
        &self,
        chat_id: ChatId,
        attachment: &AttachmentRef,
    ) -> Result<MessageId, HelpdeskError> {
        let sent = media::resend(&self.bot, tg_chat(chat_id), attachment).await?;
        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn send_file(
        &self,
        chat_id: ChatId,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<MessageId, HelpdeskError> {
        let sent = media::upload_document(&self.bot, tg_chat(chat_id), filename, data).await?;
        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn download(&self, attachment: &AttachmentRef) -> Result<Vec<u8>, HelpdeskError> {
        media::download_file(&self.bot, &attachment.file_id).await
    }

    async fn receive(&self) -> Result<InboundEvent, HelpdeskError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| HelpdeskError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}
