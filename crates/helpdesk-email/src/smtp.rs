// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP mail transport built on lettre.

use async_trait::async_trait;
use helpdesk_config::model::SmtpConfig;
use helpdesk_core::error::HelpdeskError;
use helpdesk_core::traits::{MailTransport, PluginAdapter};
use helpdesk_core::types::{AdapterType, HealthStatus, MailAttachment, OutgoingMail};
use lettre::message::header::{ContentType, Header, HeaderName, HeaderValue};
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

/// `X-Chat-Id` header carrying the conversant id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XChatId(pub String);

impl Header for XChatId {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-Chat-Id")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.trim().to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

fn mail_error(message: String, e: impl std::error::Error + Send + Sync + 'static) -> HelpdeskError {
    HelpdeskError::Mail {
        message,
        source: Some(Box::new(e)),
    }
}

fn parse_mailbox(addr: &str) -> Result<Mailbox, HelpdeskError> {
    addr.parse::<Mailbox>()
        .map_err(|e| HelpdeskError::Config(format!("invalid email address {addr:?}: {e}")))
}

fn attachment_part(att: &MailAttachment) -> SinglePart {
    let content_type = ContentType::parse(&format!("{}/{}", att.mime_major, att.mime_minor))
        .or_else(|_| ContentType::parse("application/octet-stream"))
        .unwrap_or(ContentType::TEXT_PLAIN);
    Attachment::new(att.filename.clone()).body(att.data.clone(), content_type)
}

/// Builds the RFC 5322 message for `mail`: a plain-text body followed by
/// one part per attachment, in order.
pub fn build_message(
    from: &Mailbox,
    to: &Mailbox,
    mail: &OutgoingMail,
) -> Result<Message, HelpdeskError> {
    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(mail.body.clone()));
    for att in &mail.attachments {
        parts = parts.singlepart(attachment_part(att));
    }

    Message::builder()
        .from(from.clone())
        .to(to.clone())
        .subject(mail.subject.clone())
        .header(XChatId(mail.conversant.to_string()))
        .multipart(parts)
        .map_err(|e| mail_error(format!("failed to build message: {e}"), e))
}

/// Authenticated SMTP transport.
///
/// Port 465 uses implicit TLS, any other port STARTTLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// Creates a mailer from the `[smtp]` config section.
    ///
    /// Requires credentials plus a resolvable sender and recipient.
    pub fn new(config: &SmtpConfig) -> Result<Self, HelpdeskError> {
        let (Some(username), Some(password)) = (&config.username, &config.password) else {
            return Err(HelpdeskError::Config(
                "smtp.username and smtp.password are required".into(),
            ));
        };
        let from = parse_mailbox(config.sender().unwrap_or(username))?;
        let to = parse_mailbox(config.recipient().unwrap_or(username))?;

        let builder = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| mail_error(format!("invalid SMTP relay {}: {e}", config.host), e))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(username.clone(), password.clone()))
            .build();

        info!(host = config.host, port = config.port, "SMTP mailer initialized");
        Ok(Self {
            transport,
            from,
            to,
        })
    }
}

#[async_trait]
impl PluginAdapter for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Mail
    }

    async fn health_check(&self) -> Result<HealthStatus, HelpdeskError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(HealthStatus::Healthy),
            Ok(false) => Ok(HealthStatus::Degraded("SMTP server did not answer NOOP".into())),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("SMTP unreachable: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), HelpdeskError> {
        Ok(())
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send_mail(&self, mail: OutgoingMail) -> Result<(), HelpdeskError> {
        let message = build_message(&self.from, &self.to, &mail)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| mail_error(format!("SMTP send failed: {e}"), e))?;
        debug!(
            chat_id = %mail.conversant,
            attachments = mail.attachments.len(),
            "request email sent"
        );
        Ok(())
    }
}
