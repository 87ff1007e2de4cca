// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the front-end messaging platform.

use async_trait::async_trait;

use crate::error::HelpdeskError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AttachmentRef, ChatId, InboundEvent, MessageId, OutboundMessage};

/// Adapter for the messaging platform conversants talk to.
///
/// Inbound events for a single conversant are delivered in order; the intake
/// loop consumes them one at a time.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), HelpdeskError>;

    /// Sends a text message, optionally with an inline keyboard.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, HelpdeskError>;

    /// Re-sends a previously collected file by its platform reference.
    async fn send_attachment(
        &self,
        chat_id: ChatId,
        attachment: &AttachmentRef,
    ) -> Result<MessageId, HelpdeskError>;

    /// Uploads raw bytes as a document.
    async fn send_file(
        &self,
        chat_id: ChatId,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<MessageId, HelpdeskError>;

    /// Resolves a file reference and downloads its content.
    async fn download(&self, attachment: &AttachmentRef) -> Result<Vec<u8>, HelpdeskError>;

    /// Receives the next inbound event from the platform.
    async fn receive(&self) -> Result<InboundEvent, HelpdeskError>;
}
