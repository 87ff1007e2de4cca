// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intake loop and form state machine for the helpdesk bot.
//!
//! The [`IntakeLoop`] is the central coordinator that:
//! - Receives events from a channel adapter
//! - Drives each conversant's form through [`router::FormRouter`]
//! - Hands confirmed forms to [`delivery::Delivery`]
//! - Stops on the shutdown token
//!
//! Support replies travel the other way through [`poller::ReplyPoller`].

pub mod delivery;
pub mod form;
pub mod poller;
pub mod prompts;
pub mod router;
pub mod shutdown;
pub mod store;
pub mod summary;
pub mod validate;
pub mod watch;

use std::sync::Arc;

use helpdesk_core::error::HelpdeskError;
use helpdesk_core::traits::ChannelAdapter;
use helpdesk_core::types::OutboundMessage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::router::FormRouter;

/// Pulls inbound events off the channel and routes them one at a time.
pub struct IntakeLoop {
    channel: Arc<dyn ChannelAdapter>,
    router: FormRouter,
}

impl IntakeLoop {
    pub fn new(channel: Arc<dyn ChannelAdapter>, router: FormRouter) -> Self {
        Self { channel, router }
    }

    /// Runs until `cancel` fires or the channel closes.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), HelpdeskError> {
        info!("intake loop running");

        loop {
            tokio::select! {
                event = self.channel.receive() => {
                    match event {
                        Ok(event) => {
                            let chat = event.chat_id;
                            debug!(chat_id = %chat, "handling inbound event");
                            if let Err(e) = self.router.handle(event).await {
                                error!(chat_id = %chat, error = %e, "failed to submit request");
                                let notice = OutboundMessage::text(chat, prompts::SUBMISSION_FAILED);
                                if let Err(e) = self.channel.send(notice).await {
                                    warn!(chat_id = %chat, error = %e, "failed to report submission failure");
                                }
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                            break;
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping intake loop");
                    break;
                }
            }
        }

        info!("intake loop stopped");
        Ok(())
    }
}
