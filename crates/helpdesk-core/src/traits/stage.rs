// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversant stage store shared by the form router and the reply poller.

use async_trait::async_trait;

use crate::types::{ChatId, Stage};

/// Read/write access to the current [`Stage`] of each conversant.
///
/// `None` means the conversant has no form in progress.
#[async_trait]
pub trait StageStore: Send + Sync {
    async fn get(&self, chat_id: ChatId) -> Option<Stage>;

    async fn set(&self, chat_id: ChatId, stage: Option<Stage>);

    async fn clear(&self, chat_id: ChatId);

    /// Clears the stage only if it currently equals `expected`.
    ///
    /// The comparison and the removal happen under one lock, so a concurrent
    /// `set` either lands before (and the clear fails) or after.
    /// Returns `true` if the stage was cleared.
    async fn clear_if(&self, chat_id: ChatId, expected: Stage) -> bool;
}
