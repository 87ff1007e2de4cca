// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply correlation poller.
//!
//! Every cycle fetches the comments of each watched ticket, picks the ones
//! newer than the watch's `last_seen`, and delivers each to the conversant
//! only if the conversant is still waiting for a reply. A comment is
//! processed at most once whether or not it was delivered.

use std::sync::Arc;
use std::time::Duration;

use helpdesk_core::traits::{ChannelAdapter, StageStore, TrackerAdapter};
use helpdesk_core::types::{Comment, OutboundMessage, Stage};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::prompts;
use crate::watch::{TicketWatch, WatchRegistry};

/// Polls the tracker for replies to watched tickets.
pub struct ReplyPoller {
    tracker: Arc<dyn TrackerAdapter>,
    channel: Arc<dyn ChannelAdapter>,
    stages: Arc<dyn StageStore>,
    watches: Arc<WatchRegistry>,
    interval: Duration,
}

/// Comments newer than `last_seen`, oldest first.
pub fn new_comments(mut comments: Vec<Comment>, last_seen: Option<i64>) -> Vec<Comment> {
    comments.sort_by_key(|c| (c.created_at, c.id));
    comments
        .into_iter()
        .filter(|c| last_seen.is_none_or(|seen| c.id > seen))
        .collect()
}

impl ReplyPoller {
    pub fn new(
        tracker: Arc<dyn TrackerAdapter>,
        channel: Arc<dyn ChannelAdapter>,
        stages: Arc<dyn StageStore>,
        watches: Arc<WatchRegistry>,
        interval: Duration,
    ) -> Self {
        Self {
            tracker,
            channel,
            stages,
            watches,
            interval,
        }
    }

    /// Runs until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        info!(interval_secs = self.interval.as_secs(), "reply poller started");
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let delivered = self.poll_once().await;
                    if delivered > 0 {
                        info!(delivered, "support replies delivered");
                    }
                }
            }
        }
        info!("reply poller stopped");
    }

    /// One pass over every watch. Returns the number of comments delivered.
    pub async fn poll_once(&self) -> usize {
        let mut delivered = 0;
        for watch in self.watches.snapshot().await {
            delivered += self.poll_watch(&watch).await;
        }
        delivered
    }

    async fn poll_watch(&self, watch: &TicketWatch) -> usize {
        let comments = match self.tracker.get_comments(&watch.ticket).await {
            Ok(comments) => comments,
            Err(e) if e.is_not_found() => {
                warn!(ticket = %watch.ticket, "ticket not found while polling comments");
                return 0;
            }
            Err(e) => {
                warn!(ticket = %watch.ticket, error = %e, "failed to fetch comments");
                return 0;
            }
        };

        let fresh = new_comments(comments, watch.last_seen);
        let mut delivered = 0;
        for comment in &fresh {
            if self
                .stages
                .clear_if(watch.chat_id, Stage::AwaitingSupportResponse)
                .await
            {
                let text = prompts::support_reply(&watch.ticket, &comment.text);
                match self.channel.send(OutboundMessage::text(watch.chat_id, text)).await {
                    Ok(_) => {
                        debug!(ticket = %watch.ticket, comment = comment.id, chat_id = %watch.chat_id, "support reply delivered");
                        delivered += 1;
                    }
                    Err(e) => {
                        error!(ticket = %watch.ticket, comment = comment.id, chat_id = %watch.chat_id, error = %e, "failed to deliver support reply");
                    }
                }
            } else {
                debug!(ticket = %watch.ticket, comment = comment.id, "conversant not waiting, comment suppressed");
            }
            self.watches.mark_seen(&watch.ticket, comment.id).await;
        }

        // The conversant's wait is over once a reply went out; later comments
        // would be suppressed anyway. A failed send keeps the ticket watched.
        if delivered > 0 {
            self.watches.remove(&watch.ticket).await;
        }
        delivered
    }
}
