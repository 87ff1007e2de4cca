// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory session store.
//!
//! Holds one [`FormSession`] per conversant. The stage of a session is what
//! [`StageStore`] exposes to the reply poller.

use std::collections::HashMap;

use async_trait::async_trait;
use helpdesk_core::traits::StageStore;
use helpdesk_core::types::{ChatId, Stage};
use tokio::sync::Mutex;

use crate::form::FormSession;

/// Memory-resident sessions keyed by conversant.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<ChatId, FormSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fresh session, discarding any previous one.
    pub async fn begin(&self, chat_id: ChatId) {
        self.sessions.lock().await.insert(chat_id, FormSession::new());
    }

    /// Runs `f` against the conversant's session under the store lock.
    ///
    /// Returns `None` when the conversant has no session.
    pub async fn update<R>(
        &self,
        chat_id: ChatId,
        f: impl FnOnce(&mut FormSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.lock().await;
        sessions.get_mut(&chat_id).map(f)
    }

    /// Number of conversants with a session.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

#[async_trait]
impl StageStore for SessionStore {
    async fn get(&self, chat_id: ChatId) -> Option<Stage> {
        self.sessions.lock().await.get(&chat_id).map(FormSession::stage)
    }

    /// Setting a stage drops whatever form data the session held.
    async fn set(&self, chat_id: ChatId, stage: Option<Stage>) {
        let mut sessions = self.sessions.lock().await;
        match stage {
            Some(stage) => {
                sessions.insert(chat_id, FormSession::at_stage(stage));
            }
            None => {
                sessions.remove(&chat_id);
            }
        }
    }

    async fn clear(&self, chat_id: ChatId) {
        self.sessions.lock().await.remove(&chat_id);
    }

    async fn clear_if(&self, chat_id: ChatId, expected: Stage) -> bool {
        let mut sessions = self.sessions.lock().await;
        match sessions.get(&chat_id) {
            Some(session) if session.stage() == expected => {
                sessions.remove(&chat_id);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormInput;
    use std::sync::Arc;

    const CHAT: ChatId = ChatId(42);

    #[tokio::test]
    async fn begin_replaces_previous_session() {
        let store = SessionStore::new();
        store.begin(CHAT).await;
        store
            .update(CHAT, |s| s.apply(FormInput::Text("Acme".into())))
            .await;
        assert_eq!(store.get(CHAT).await, Some(Stage::AwaitingFullName));

        store.begin(CHAT).await;
        assert_eq!(store.get(CHAT).await, Some(Stage::AwaitingOrganization));
    }

    #[tokio::test]
    async fn update_without_session_is_none() {
        let store = SessionStore::new();
        assert!(store.update(CHAT, |s| s.stage()).await.is_none());
    }

    #[tokio::test]
    async fn set_and_clear() {
        let store = SessionStore::new();
        store.set(CHAT, Some(Stage::AwaitingSupportResponse)).await;
        assert_eq!(store.get(CHAT).await, Some(Stage::AwaitingSupportResponse));
        store.set(CHAT, None).await;
        assert_eq!(store.get(CHAT).await, None);

        store.begin(CHAT).await;
        store.clear(CHAT).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn clear_if_only_on_matching_stage() {
        let store = SessionStore::new();
        assert!(!store.clear_if(CHAT, Stage::AwaitingSupportResponse).await);

        store.begin(CHAT).await;
        assert!(!store.clear_if(CHAT, Stage::AwaitingSupportResponse).await);
        assert_eq!(store.get(CHAT).await, Some(Stage::AwaitingOrganization));

        store.set(CHAT, Some(Stage::AwaitingSupportResponse)).await;
        assert!(store.clear_if(CHAT, Stage::AwaitingSupportResponse).await);
        assert_eq!(store.get(CHAT).await, None);
    }

    #[tokio::test]
    async fn concurrent_clear_if_succeeds_once() {
        let store = Arc::new(SessionStore::new());
        store.set(CHAT, Some(Stage::AwaitingSupportResponse)).await;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.clear_if(CHAT, Stage::AwaitingSupportResponse).await
                })
            })
            .collect();

        let mut cleared = 0;
        for handle in handles {
            if handle.await.unwrap() {
                cleared += 1;
            }
        }
        assert_eq!(cleared, 1);
    }
}
