// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket watches: which conversant waits on which tracker issue.

use std::collections::HashMap;

use helpdesk_core::types::{ChatId, IssueKey};
use tokio::sync::Mutex;

/// Correlates one tracker issue with the conversant who opened it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketWatch {
    pub ticket: IssueKey,
    pub chat_id: ChatId,
    /// Highest comment id already processed.
    pub last_seen: Option<i64>,
}

/// Registry shared between the submission path and the reply poller.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    watches: Mutex<HashMap<IssueKey, TicketWatch>>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts watching `ticket` on behalf of `chat_id`. Re-registering a
    /// ticket resets its progress.
    pub async fn register(&self, ticket: IssueKey, chat_id: ChatId) {
        let watch = TicketWatch {
            ticket: ticket.clone(),
            chat_id,
            last_seen: None,
        };
        self.watches.lock().await.insert(ticket, watch);
    }

    /// Copy of every watch, ordered by ticket key.
    pub async fn snapshot(&self) -> Vec<TicketWatch> {
        let mut watches: Vec<_> = self.watches.lock().await.values().cloned().collect();
        watches.sort_by(|a, b| a.ticket.0.cmp(&b.ticket.0));
        watches
    }

    pub async fn conversant(&self, ticket: &IssueKey) -> Option<ChatId> {
        self.watches.lock().await.get(ticket).map(|w| w.chat_id)
    }

    pub async fn last_seen(&self, ticket: &IssueKey) -> Option<i64> {
        self.watches
            .lock()
            .await
            .get(ticket)
            .and_then(|w| w.last_seen)
    }

    /// Records `comment_id` as processed. Never moves backwards.
    pub async fn mark_seen(&self, ticket: &IssueKey, comment_id: i64) {
        if let Some(watch) = self.watches.lock().await.get_mut(ticket) {
            watch.last_seen = Some(watch.last_seen.map_or(comment_id, |seen| seen.max(comment_id)));
        }
    }

    pub async fn remove(&self, ticket: &IssueKey) -> Option<TicketWatch> {
        self.watches.lock().await.remove(ticket)
    }

    pub async fn len(&self) -> usize {
        self.watches.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.watches.lock().await.is_empty()
    }
}
