// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticketing system adapter trait.

use async_trait::async_trait;

use crate::error::HelpdeskError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Comment, IntakeForm, IssueKey};

/// Adapter for the external issue tracker support staff answer in.
#[async_trait]
pub trait TrackerAdapter: PluginAdapter {
    /// Opens an issue for a submitted form and returns its key.
    async fn create_issue(&self, form: &IntakeForm) -> Result<IssueKey, HelpdeskError>;

    /// Attaches a file to an existing issue.
    async fn upload_attachment(
        &self,
        key: &IssueKey,
        data: Vec<u8>,
        filename: &str,
    ) -> Result<(), HelpdeskError>;

    /// Returns every comment of the issue, in whatever order the tracker uses.
    async fn get_comments(&self, key: &IssueKey) -> Result<Vec<Comment>, HelpdeskError>;
}
