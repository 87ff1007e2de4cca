// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mail transport trait for notifying administrators by email.

use async_trait::async_trait;

use crate::error::HelpdeskError;
use crate::traits::adapter::PluginAdapter;
use crate::types::OutgoingMail;

/// Submits fully formed messages to the administrators' mailbox.
#[async_trait]
pub trait MailTransport: PluginAdapter {
    /// Sends the message. Fails on connection, authentication, or rejection.
    async fn send_mail(&self, mail: OutgoingMail) -> Result<(), HelpdeskError>;
}
