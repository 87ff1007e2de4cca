// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Yandex Tracker adapter for the helpdesk intake bot.
//!
//! This crate implements [`TrackerAdapter`] on top of the Tracker REST API:
//! issues are opened in a configured queue, attachments are uploaded after
//! creation, and comments are listed for reply correlation.

pub mod client;
pub mod types;

use async_trait::async_trait;
use helpdesk_config::model::TrackerConfig;
use helpdesk_core::error::HelpdeskError;
use helpdesk_core::traits::{PluginAdapter, TrackerAdapter};
use helpdesk_core::types::{AdapterType, Comment, HealthStatus, IntakeForm, IssueKey};
use tracing::{debug, info};

use crate::client::TrackerClient;
use crate::types::{ContactFields, CreateIssueRequest, NamedRef};

/// Yandex Tracker implementing [`TrackerAdapter`].
pub struct YandexTracker {
    client: TrackerClient,
    queue: String,
    issue_type: String,
}

impl YandexTracker {
    /// Creates a tracker adapter from the `[tracker]` config section.
    ///
    /// Fails when no OAuth token is configured.
    pub fn new(config: &TrackerConfig) -> Result<Self, HelpdeskError> {
        let token = config.token.as_deref().ok_or_else(|| {
            HelpdeskError::Config(
                "tracker token is required (set tracker.token or HELPDESK_TRACKER_TOKEN)".into(),
            )
        })?;
        let client = TrackerClient::new(token, config.org_id.as_deref(), &config.base_url)?;

        info!(queue = config.queue, "tracker adapter initialized");
        Ok(Self {
            client,
            queue: config.queue.clone(),
            issue_type: config.issue_type.clone(),
        })
    }

    fn issue_request(&self, form: &IntakeForm) -> CreateIssueRequest {
        CreateIssueRequest {
            queue: self.queue.clone(),
            summary: issue_summary(form),
            description: form.description.clone(),
            issue_type: NamedRef {
                name: self.issue_type.clone(),
            },
            custom_fields: ContactFields {
                full_name: form.full_name.clone(),
                phone: form.phone.clone(),
                email: form.email.clone(),
            },
        }
    }
}

/// Issue title: `<topic> — <organization>`.
pub fn issue_summary(form: &IntakeForm) -> String {
    format!("{} — {}", form.topic, form.organization)
}

#[async_trait]
impl PluginAdapter for YandexTracker {
    fn name(&self) -> &str {
        "yandex-tracker"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Tracker
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        match self.client.myself().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        Ok(())
    }
}

#[async_trait]
impl TrackerAdapter for YandexTracker {
    async fn create_issue(&self, form: &IntakeForm) -> Result<IssueKey, HelpdeskError> {
        let issue = self.client.create_issue(&self.issue_request(form)).await?;
        info!(key = issue.key, "tracker issue created");
        Ok(IssueKey(issue.key))
    }

    async fn upload_attachment(
        &self,
        key: &IssueKey,
        data: Vec<u8>,
        filename: &str,
    ) -> Result<(), HelpdeskError> {
        debug!(key = %key, filename, size = data.len(), "uploading attachment");
        self.client.upload_attachment(&key.0, data, filename).await
    }

    async fn get_comments(&self, key: &IssueKey) -> Result<Vec<Comment>, HelpdeskError> {
        let comments = self.client.get_comments(&key.0).await?;
        Ok(comments
            .into_iter()
            .map(|c| Comment {
                id: c.id,
                text: c.text.unwrap_or_default(),
                created_at: c.created_at,
            })
            .collect())
    }
}
