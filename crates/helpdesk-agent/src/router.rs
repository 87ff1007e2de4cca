// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes inbound events through the form state machine.
//!
//! Cancel is checked first and works in any stage, start second; everything
//! else is handed to the conversant's [`FormSession`](crate::form::FormSession).

use std::sync::Arc;

use helpdesk_core::error::HelpdeskError;
use helpdesk_core::traits::{ChannelAdapter, StageStore};
use helpdesk_core::types::{
    Button, ChatId, InboundContent, InboundEvent, IntakeForm, OutboundMessage, Stage,
};
use tracing::{debug, info, warn};

use crate::delivery::Delivery;
use crate::form::{CONFIRM_NO, CONFIRM_YES, FormInput, Step};
use crate::store::SessionStore;
use crate::watch::WatchRegistry;
use crate::{prompts, summary};

/// Commands recognized in conversant text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start` or `/support`.
    Start,
    /// `/cancel`.
    Cancel,
    /// `/skip` or `/done`.
    Skip,
}

/// Parses a command, ignoring case, a `@botname` suffix and any arguments.
pub fn parse_command(text: &str) -> Option<Command> {
    let word = text.split_whitespace().next()?;
    let word = word.strip_prefix('/')?;
    let name = word.split('@').next().unwrap_or(word).to_lowercase();
    match name.as_str() {
        "start" | "support" => Some(Command::Start),
        "cancel" => Some(Command::Cancel),
        "skip" | "done" => Some(Command::Skip),
        _ => None,
    }
}

/// Handles one conversant event at a time.
pub struct FormRouter {
    channel: Arc<dyn ChannelAdapter>,
    store: Arc<SessionStore>,
    watches: Arc<WatchRegistry>,
    delivery: Delivery,
}

impl FormRouter {
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        store: Arc<SessionStore>,
        watches: Arc<WatchRegistry>,
        delivery: Delivery,
    ) -> Self {
        Self {
            channel,
            store,
            watches,
            delivery,
        }
    }

    /// Processes one event.
    ///
    /// Only a failed submission is returned as an error; by then the
    /// conversant's session has been discarded.
    pub async fn handle(&self, event: InboundEvent) -> Result<(), HelpdeskError> {
        let chat = event.chat_id;
        let input = match event.content {
            InboundContent::Text(text) => match parse_command(&text) {
                Some(Command::Cancel) => {
                    self.store.clear(chat).await;
                    debug!(chat_id = %chat, "session cancelled");
                    self.reply(chat, prompts::CANCELLED).await;
                    return Ok(());
                }
                Some(Command::Start) => {
                    self.store.begin(chat).await;
                    debug!(chat_id = %chat, "session started");
                    self.reply(chat, prompts::START).await;
                    return Ok(());
                }
                Some(Command::Skip) => FormInput::Skip,
                None => FormInput::Text(text),
            },
            InboundContent::Attachment(attachment) => FormInput::Attachment(attachment),
            InboundContent::Choice(data) => FormInput::Choice(data),
        };
        let is_choice = matches!(input, FormInput::Choice(_));

        let Some(step) = self.store.update(chat, |session| session.apply(input)).await else {
            if !is_choice {
                self.reply(chat, prompts::NO_SESSION).await;
            }
            return Ok(());
        };

        match step {
            Step::Advanced(stage) => self.reply(chat, prompts::for_stage(stage)).await,
            Step::Invalid(e) => self.reply(chat, &e.to_string()).await,
            Step::Reprompt(stage) => self.reply(chat, prompts::reprompt(stage)).await,
            Step::AttachmentAdded(count) => {
                self.reply(chat, &prompts::attachment_received(count)).await
            }
            Step::ReadyToConfirm(form) => self.ask_confirmation(chat, &form).await,
            Step::Confirmed(form) => return self.submit(chat, form).await,
            Step::Rejected => {
                self.store.clear(chat).await;
                self.reply(chat, prompts::REJECTED).await;
            }
            Step::Ignored => {
                if !is_choice
                    && self.store.get(chat).await == Some(Stage::AwaitingSupportResponse)
                {
                    self.reply(chat, prompts::WAITING_FOR_REPLY).await;
                } else {
                    debug!(chat_id = %chat, "input ignored at current stage");
                }
            }
        }
        Ok(())
    }

    async fn ask_confirmation(&self, chat: ChatId, form: &IntakeForm) {
        let msg = OutboundMessage::html(chat, summary::review(form)).with_buttons(vec![
            Button::new(prompts::CONFIRM_BUTTON, CONFIRM_YES),
            Button::new(prompts::REJECT_BUTTON, CONFIRM_NO),
        ]);
        self.send(msg).await;
    }

    async fn submit(&self, chat: ChatId, form: IntakeForm) -> Result<(), HelpdeskError> {
        let key = match self.delivery.submit(chat, &form).await {
            Ok(key) => key,
            Err(e) => {
                self.store.clear(chat).await;
                return Err(e);
            }
        };

        self.watches.register(key.clone(), chat).await;
        self.store
            .set(chat, Some(Stage::AwaitingSupportResponse))
            .await;
        info!(chat_id = %chat, ticket = %key, "waiting for support reply");
        self.send(OutboundMessage::html(chat, prompts::ticket_created(&key)))
            .await;
        Ok(())
    }

    /// Sends a plain-text reply, logging failures.
    pub async fn reply(&self, chat: ChatId, text: &str) {
        self.send(OutboundMessage::text(chat, text)).await;
    }

    async fn send(&self, msg: OutboundMessage) {
        let chat = msg.chat_id;
        if let Err(e) = self.channel.send(msg).await {
            warn!(chat_id = %chat, error = %e, "failed to send reply");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_recognized() {
        assert_eq!(parse_command("/start"), Some(Command::Start));
        assert_eq!(parse_command("/support"), Some(Command::Start));
        assert_eq!(parse_command("/cancel"), Some(Command::Cancel));
        assert_eq!(parse_command("/skip"), Some(Command::Skip));
        assert_eq!(parse_command("/done"), Some(Command::Skip));
    }

    #[test]
    fn commands_ignore_case_suffix_and_args() {
        assert_eq!(parse_command("/SKIP"), Some(Command::Skip));
        assert_eq!(parse_command("/support@HelpdeskBot"), Some(Command::Start));
        assert_eq!(parse_command("  /cancel please"), Some(Command::Cancel));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("skip"), None);
        assert_eq!(parse_command("/help"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("Acme /cancel"), None);
    }
}
