// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock mail transport capturing every message it is asked to send.

use async_trait::async_trait;
use tokio::sync::Mutex;

use helpdesk_core::HelpdeskError;
use helpdesk_core::traits::{MailTransport, PluginAdapter};
use helpdesk_core::types::{AdapterType, HealthStatus, OutgoingMail};

/// A mock SMTP transport.
///
/// Sent mail is kept for inspection via `sent()`. After `fail_with()`, every
/// send fails with that message and nothing is captured.
pub struct MockMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    failure: Mutex<Option<String>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    pub async fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().await.clone()
    }

    pub async fn fail_with(&self, message: &str) {
        *self.failure.lock().await = Some(message.to_string());
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockMailer {
    fn name(&self) -> &str {
        "mock-mailer"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Mail
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        Ok(())
    }
}

#[async_trait]
impl MailTransport for MockMailer {
    async fn send_mail(&self, mail: OutgoingMail) -> Result<(), HelpdeskError> {
        if let Some(message) = self.failure.lock().await.clone() {
            return Err(HelpdeskError::Mail {
                message,
                source: None,
            });
        }
        self.sent.lock().await.push(mail);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_core::types::ChatId;

    #[tokio::test]
    async fn captures_and_fails_on_demand() {
        let mailer = MockMailer::new();
        let mail = OutgoingMail::tagged(ChatId(1), "Topic", "body", vec![]);
        mailer.send_mail(mail.clone()).await.unwrap();
        assert_eq!(mailer.sent().await, vec![mail.clone()]);

        mailer.fail_with("550 rejected").await;
        let err = mailer.send_mail(mail).await.unwrap_err();
        assert_eq!(err.to_string(), "mail error: 550 rejected");
        assert_eq!(mailer.sent().await.len(), 1);
    }
}
