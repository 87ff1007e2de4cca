// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the complete intake stack (router, delivery,
//! session store, watch registry, reply poller) over mock adapters and
//! exposes helpers that drive it the way a conversant would.

use std::sync::Arc;
use std::time::Duration;

use helpdesk_agent::IntakeLoop;
use helpdesk_agent::delivery::Delivery;
use helpdesk_agent::poller::ReplyPoller;
use helpdesk_agent::router::FormRouter;
use helpdesk_agent::store::SessionStore;
use helpdesk_agent::watch::WatchRegistry;
use helpdesk_core::HelpdeskError;
use helpdesk_core::traits::StageStore;
use helpdesk_core::types::{
    AttachmentKind, AttachmentRef, ChatId, InboundContent, InboundEvent, Stage,
};

use crate::mock_channel::MockChannel;
use crate::mock_mailer::MockMailer;
use crate::mock_tracker::MockTracker;

/// Chat that receives administrator notifications unless overridden.
pub const ADMIN_CHAT: ChatId = ChatId(-100500);

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    admin_chat: Option<ChatId>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            admin_chat: Some(ADMIN_CHAT),
        }
    }

    /// Set the administrator chat. `None` disables chat notifications.
    pub fn with_admin_chat(mut self, admin_chat: Option<ChatId>) -> Self {
        self.admin_chat = admin_chat;
        self
    }

    pub fn build(self) -> TestHarness {
        TestHarness {
            channel: Arc::new(MockChannel::new()),
            mailer: Arc::new(MockMailer::new()),
            tracker: Arc::new(MockTracker::new()),
            store: Arc::new(SessionStore::new()),
            watches: Arc::new(WatchRegistry::new()),
            admin_chat: self.admin_chat,
        }
    }
}

/// A complete intake environment over mock adapters.
pub struct TestHarness {
    pub channel: Arc<MockChannel>,
    pub mailer: Arc<MockMailer>,
    pub tracker: Arc<MockTracker>,
    pub store: Arc<SessionStore>,
    pub watches: Arc<WatchRegistry>,
    admin_chat: Option<ChatId>,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A router sharing this harness's state and adapters.
    pub fn router(&self) -> FormRouter {
        let delivery = Delivery::new(
            self.channel.clone(),
            self.mailer.clone(),
            self.tracker.clone(),
            self.admin_chat,
        );
        FormRouter::new(
            self.channel.clone(),
            self.store.clone(),
            self.watches.clone(),
            delivery,
        )
    }

    /// An intake loop reading events injected into [`Self::channel`].
    pub fn intake_loop(&self) -> IntakeLoop {
        IntakeLoop::new(self.channel.clone(), self.router())
    }

    /// A reply poller over the mock tracker.
    pub fn poller(&self) -> ReplyPoller {
        ReplyPoller::new(
            self.tracker.clone(),
            self.channel.clone(),
            self.store.clone(),
            self.watches.clone(),
            Duration::from_millis(10),
        )
    }

    pub async fn handle(&self, chat: ChatId, content: InboundContent) -> Result<(), HelpdeskError> {
        self.router().handle(event(chat, content)).await
    }

    pub async fn send_text(&self, chat: ChatId, text: &str) -> Result<(), HelpdeskError> {
        self.handle(chat, InboundContent::Text(text.to_string())).await
    }

    /// Sends a document and registers `data` as its downloadable content.
    pub async fn send_file(
        &self,
        chat: ChatId,
        filename: &str,
        mime_type: &str,
        data: Vec<u8>,
    ) -> Result<(), HelpdeskError> {
        let file_id = format!("file-{filename}");
        self.channel.set_file(&file_id, data).await;
        let attachment = AttachmentRef {
            kind: AttachmentKind::Document,
            file_id,
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
        };
        self.handle(chat, InboundContent::Attachment(attachment)).await
    }

    /// Presses an inline button carrying `data`.
    pub async fn press(&self, chat: ChatId, data: &str) -> Result<(), HelpdeskError> {
        self.handle(chat, InboundContent::Choice(data.to_string())).await
    }

    pub async fn stage(&self, chat: ChatId) -> Option<Stage> {
        self.store.get(chat).await
    }

    /// Runs one reply polling pass and returns the number of replies delivered.
    pub async fn poll(&self) -> usize {
        self.poller().poll_once().await
    }

    /// Fills every text field of the form with valid values.
    pub async fn fill_form(&self, chat: ChatId) -> Result<(), HelpdeskError> {
        for text in [
            "/support",
            "Acme",
            "Jane Doe",
            "+19995551234",
            "jane@acme.com",
            "Login issue",
            "Cannot log in since yesterday",
        ] {
            self.send_text(chat, text).await?;
        }
        Ok(())
    }

    /// Content of the last message sent to `chat`.
    pub async fn last_message(&self, chat: ChatId) -> Option<String> {
        self.channel
            .sent_messages()
            .await
            .into_iter()
            .rev()
            .find(|m| m.chat_id == chat)
            .map(|m| m.content)
    }
}

/// An inbound event stamped with the current time.
pub fn event(chat: ChatId, content: InboundContent) -> InboundEvent {
    InboundEvent {
        chat_id: chat,
        content,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: ChatId = ChatId(42);

    #[tokio::test]
    async fn fill_form_reaches_attachments() {
        let harness = TestHarness::default();
        harness.fill_form(USER).await.unwrap();
        assert_eq!(harness.stage(USER).await, Some(Stage::AwaitingAttachments));
    }

    #[tokio::test]
    async fn send_file_registers_download() {
        let harness = TestHarness::default();
        harness.fill_form(USER).await.unwrap();
        harness
            .send_file(USER, "log.txt", "text/plain", b"trace".to_vec())
            .await
            .unwrap();
        let att = AttachmentRef {
            kind: AttachmentKind::Document,
            file_id: "file-log.txt".into(),
            filename: "log.txt".into(),
            mime_type: "text/plain".into(),
        };
        use helpdesk_core::traits::ChannelAdapter;
        assert_eq!(harness.channel.download(&att).await.unwrap(), b"trace".to_vec());
    }
}
