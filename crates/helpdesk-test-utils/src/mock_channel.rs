// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events
//! and captured outbound messages and files for assertion in tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use helpdesk_core::HelpdeskError;
use helpdesk_core::traits::{ChannelAdapter, PluginAdapter};
use helpdesk_core::types::{
    AdapterType, AttachmentRef, ChatId, HealthStatus, InboundEvent, MessageId, OutboundMessage,
};

/// A mock messaging channel for testing.
///
/// Provides these queues:
/// - **inbound**: Events injected via `inject()` are returned by `receive()`
/// - **sent**: Messages passed to `send()`, retrievable via `sent_messages()`
/// - **attachments** / **files**: Captured `send_attachment()` and `send_file()` calls
///
/// Files served by `download()` are registered with `set_file()`.
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    attachments: Mutex<Vec<(ChatId, AttachmentRef)>>,
    files: Mutex<Vec<(ChatId, String, Vec<u8>)>>,
    stored: Mutex<HashMap<String, Vec<u8>>>,
    fail_sends: Mutex<bool>,
    next_id: AtomicU64,
    notify: Arc<Notify>,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            attachments: Mutex::new(Vec::new()),
            files: Mutex::new(Vec::new()),
            stored: Mutex::new(HashMap::new()),
            fail_sends: Mutex::new(false),
            next_id: AtomicU64::new(1),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Inject an inbound event into the receive queue.
    pub async fn inject(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    pub async fn sent_attachments(&self) -> Vec<(ChatId, AttachmentRef)> {
        self.attachments.lock().await.clone()
    }

    pub async fn sent_files(&self) -> Vec<(ChatId, String, Vec<u8>)> {
        self.files.lock().await.clone()
    }

    /// Register the content `download()` returns for `file_id`.
    pub async fn set_file(&self, file_id: &str, data: Vec<u8>) {
        self.stored.lock().await.insert(file_id.to_string(), data);
    }

    /// Make `send()` fail. Attachment and file uploads are unaffected.
    pub async fn fail_sends(&self, fail: bool) {
        *self.fail_sends.lock().await = fail;
    }

    fn next_message_id(&self) -> MessageId {
        MessageId(format!(
            "mock-msg-{}",
            self.next_id.fetch_add(1, Ordering::Relaxed)
        ))
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), HelpdeskError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, HelpdeskError> {
        if *self.fail_sends.lock().await {
            return Err(HelpdeskError::channel("mock send failure"));
        }
        self.sent.lock().await.push(msg);
        Ok(self.next_message_id())
    }

    async fn send_attachment(
        &self,
        chat_id: ChatId,
        attachment: &AttachmentRef,
    ) -> Result<MessageId, HelpdeskError> {
        self.attachments
            .lock()
            .await
            .push((chat_id, attachment.clone()));
        Ok(self.next_message_id())
    }

    async fn send_file(
        &self,
        chat_id: ChatId,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<MessageId, HelpdeskError> {
        self.files
            .lock()
            .await
            .push((chat_id, filename.to_string(), data));
        Ok(self.next_message_id())
    }

    async fn download(&self, attachment: &AttachmentRef) -> Result<Vec<u8>, HelpdeskError> {
        self.stored
            .lock()
            .await
            .get(&attachment.file_id)
            .cloned()
            .ok_or_else(|| HelpdeskError::channel(format!("unknown file {}", attachment.file_id)))
    }

    async fn receive(&self) -> Result<InboundEvent, HelpdeskError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            // Wait for notification that a new event was injected
            self.notify.notified().await;
        }
    }
}
