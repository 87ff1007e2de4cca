// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock ticketing system.
//!
//! Issues get sequential keys `SUPPORT-1`, `SUPPORT-2`, ... Comments are
//! scripted per issue with `set_comments()`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use helpdesk_core::HelpdeskError;
use helpdesk_core::traits::{PluginAdapter, TrackerAdapter};
use helpdesk_core::types::{AdapterType, Comment, HealthStatus, IntakeForm, IssueKey};

#[derive(Default)]
struct Failures {
    create: bool,
    uploads: bool,
    comments: bool,
}

/// A mock tracker recording created issues and uploaded files.
pub struct MockTracker {
    next_key: AtomicU64,
    created: Mutex<Vec<IntakeForm>>,
    uploads: Mutex<Vec<(IssueKey, String, Vec<u8>)>>,
    comments: Mutex<HashMap<IssueKey, Vec<Comment>>>,
    failures: Mutex<Failures>,
}

impl MockTracker {
    pub fn new() -> Self {
        Self {
            next_key: AtomicU64::new(1),
            created: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            comments: Mutex::new(HashMap::new()),
            failures: Mutex::new(Failures::default()),
        }
    }

    /// Forms passed to `create_issue()`, in call order.
    pub async fn created(&self) -> Vec<IntakeForm> {
        self.created.lock().await.clone()
    }

    pub async fn uploads(&self) -> Vec<(IssueKey, String, Vec<u8>)> {
        self.uploads.lock().await.clone()
    }

    /// Replace the comments returned for `key`.
    pub async fn set_comments(&self, key: &IssueKey, comments: Vec<Comment>) {
        self.comments.lock().await.insert(key.clone(), comments);
    }

    pub async fn fail_create(&self, fail: bool) {
        self.failures.lock().await.create = fail;
    }

    pub async fn fail_uploads(&self, fail: bool) {
        self.failures.lock().await.uploads = fail;
    }

    pub async fn fail_comments(&self, fail: bool) {
        self.failures.lock().await.comments = fail;
    }
}

impl Default for MockTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn server_error(message: &str) -> HelpdeskError {
    HelpdeskError::Tracker {
        message: message.to_string(),
        status: Some(500),
        source: None,
    }
}

#[async_trait]
impl PluginAdapter for MockTracker {
    fn name(&self) -> &str {
        "mock-tracker"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Tracker
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        Ok(())
    }
}

#[async_trait]
impl TrackerAdapter for MockTracker {
    async fn create_issue(&self, form: &IntakeForm) -> Result<IssueKey, HelpdeskError> {
        if self.failures.lock().await.create {
            return Err(server_error("mock create failure"));
        }
        self.created.lock().await.push(form.clone());
        let n = self.next_key.fetch_add(1, Ordering::Relaxed);
        Ok(IssueKey(format!("SUPPORT-{n}")))
    }

    async fn upload_attachment(
        &self,
        key: &IssueKey,
        data: Vec<u8>,
        filename: &str,
    ) -> Result<(), HelpdeskError> {
        if self.failures.lock().await.uploads {
            return Err(server_error("mock upload failure"));
        }
        self.uploads
            .lock()
            .await
            .push((key.clone(), filename.to_string(), data));
        Ok(())
    }

    async fn get_comments(&self, key: &IssueKey) -> Result<Vec<Comment>, HelpdeskError> {
        if self.failures.lock().await.comments {
            return Err(server_error("mock comments failure"));
        }
        Ok(self
            .comments
            .lock()
            .await
            .get(key)
            .cloned()
            .unwrap_or_default())
    }
}
