// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the adapters and the intake state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier of a chat on the messaging platform.
///
/// For private chats this is also the conversant's identity, so it doubles
/// as the key of the per-conversant form state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a message sent through a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Key of an issue opened in the ticketing system (e.g. `SUPPORT-42`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueKey(pub String);

impl std::fmt::Display for IssueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of collaborator behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Mail,
    Tracker,
}

/// Step of a conversant's intake form.
///
/// Stages are ordered; a form only moves forward one stage at a time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AwaitingOrganization,
    AwaitingFullName,
    AwaitingPhone,
    AwaitingEmail,
    AwaitingTopic,
    AwaitingDescription,
    AwaitingAttachments,
    AwaitingConfirmation,
    /// Ticket opened, waiting for the first support reply.
    AwaitingSupportResponse,
    Cancelled,
}

impl Stage {
    /// The stage that follows this one in the collection sequence.
    ///
    /// Terminal stages have no successor.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::AwaitingOrganization => Some(Stage::AwaitingFullName),
            Stage::AwaitingFullName => Some(Stage::AwaitingPhone),
            Stage::AwaitingPhone => Some(Stage::AwaitingEmail),
            Stage::AwaitingEmail => Some(Stage::AwaitingTopic),
            Stage::AwaitingTopic => Some(Stage::AwaitingDescription),
            Stage::AwaitingDescription => Some(Stage::AwaitingAttachments),
            Stage::AwaitingAttachments => Some(Stage::AwaitingConfirmation),
            Stage::AwaitingConfirmation => Some(Stage::AwaitingSupportResponse),
            Stage::AwaitingSupportResponse | Stage::Cancelled => None,
        }
    }

    /// Returns `true` for stages that end the collection flow.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::AwaitingSupportResponse | Stage::Cancelled)
    }
}

/// How an attachment arrived on the platform. Decides how it is re-sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentKind {
    Photo,
    Document,
}

/// Reference to a file stored on the messaging platform.
///
/// Filename and MIME type are resolved once when the file is collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub kind: AttachmentKind,
    pub file_id: String,
    pub filename: String,
    pub mime_type: String,
}

impl AttachmentRef {
    /// Splits the MIME type into major/minor parts.
    ///
    /// Anything that is not `major/minor` falls back to `application/octet-stream`.
    pub fn mime_parts(&self) -> (&str, &str) {
        match self.mime_type.split_once('/') {
            Some((major, minor)) if !major.is_empty() && !minor.is_empty() => (major, minor),
            _ => ("application", "octet-stream"),
        }
    }
}

/// Payload of an inbound platform event.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundContent {
    /// Plain text, including commands such as `/cancel`.
    Text(String),
    /// A photo or document.
    Attachment(AttachmentRef),
    /// An inline keyboard button press carrying its callback data.
    Choice(String),
}

/// An inbound event received from the messaging platform.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// Private chat of the conversant who produced the event.
    pub chat_id: ChatId,
    pub content: InboundContent,
    /// RFC 3339 timestamp assigned by the platform.
    pub timestamp: String,
}

/// Markup used to render an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    /// Telegram-flavoured HTML (`<b>`, `<i>`, `<code>`).
    Html,
}

/// A single inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    /// Callback data returned as [`InboundContent::Choice`] when pressed.
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// An outbound message to be sent via a channel adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub content: String,
    pub format: TextFormat,
    /// Inline buttons rendered on a single row. Empty means no keyboard.
    pub buttons: Vec<Button>,
}

impl OutboundMessage {
    /// A plain-text message.
    pub fn text(chat_id: ChatId, content: impl Into<String>) -> Self {
        Self {
            chat_id,
            content: content.into(),
            format: TextFormat::Plain,
            buttons: Vec::new(),
        }
    }

    /// A message whose content is already escaped HTML markup.
    pub fn html(chat_id: ChatId, content: impl Into<String>) -> Self {
        Self {
            format: TextFormat::Html,
            ..Self::text(chat_id, content)
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }
}

/// A fully collected intake form.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeForm {
    pub organization: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub topic: String,
    pub description: String,
    /// Attachments in collection order.
    pub attachments: Vec<AttachmentRef>,
}

/// A comment on a tracker issue.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A file attached to an outgoing email.
#[derive(Debug, Clone, PartialEq)]
pub struct MailAttachment {
    pub filename: String,
    pub mime_major: String,
    pub mime_minor: String,
    pub data: Vec<u8>,
}

/// An email addressed to the support administrators.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub subject: String,
    /// Conversant the request came from; carried in the `X-Chat-Id` header.
    pub conversant: ChatId,
    pub body: String,
    pub attachments: Vec<MailAttachment>,
}

impl OutgoingMail {
    /// A mail whose subject is tagged `[user:<id>] <topic>` so replies can be
    /// routed back to the conversant.
    pub fn tagged(
        conversant: ChatId,
        topic: &str,
        body: impl Into<String>,
        attachments: Vec<MailAttachment>,
    ) -> Self {
        Self {
            subject: format!("[user:{conversant}] {topic}"),
            conversant,
            body: body.into(),
            attachments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn attachment(mime: &str) -> AttachmentRef {
        AttachmentRef {
            kind: AttachmentKind::Document,
            file_id: "f1".into(),
            filename: "report.pdf".into(),
            mime_type: mime.into(),
        }
    }

    #[test]
    fn stage_sequence_is_linear() {
        let mut stage = Stage::AwaitingOrganization;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            visited.push(next);
            stage = next;
        }
        assert_eq!(visited.len(), 9);
        assert_eq!(stage, Stage::AwaitingSupportResponse);
        assert!(Stage::Cancelled.next().is_none());
    }

    #[test]
    fn stage_display_round_trips() {
        let s = Stage::AwaitingSupportResponse.to_string();
        assert_eq!(s, "awaiting_support_response");
        assert_eq!(Stage::from_str(&s).unwrap(), Stage::AwaitingSupportResponse);
    }

    #[test]
    fn terminal_stages() {
        assert!(Stage::AwaitingSupportResponse.is_terminal());
        assert!(Stage::Cancelled.is_terminal());
        assert!(!Stage::AwaitingConfirmation.is_terminal());
    }

    #[test]
    fn mime_parts_split() {
        assert_eq!(attachment("image/png").mime_parts(), ("image", "png"));
        assert_eq!(
            attachment("application/vnd.ms-excel").mime_parts(),
            ("application", "vnd.ms-excel")
        );
    }

    #[test]
    fn mime_parts_fallback() {
        assert_eq!(attachment("").mime_parts(), ("application", "octet-stream"));
        assert_eq!(attachment("image").mime_parts(), ("application", "octet-stream"));
        assert_eq!(attachment("/png").mime_parts(), ("application", "octet-stream"));
    }

    #[test]
    fn tagged_mail_subject() {
        let mail = OutgoingMail::tagged(ChatId(42), "Login issue", "body", vec![]);
        assert_eq!(mail.subject, "[user:42] Login issue");
        assert_eq!(mail.conversant, ChatId(42));
    }

    #[test]
    fn outbound_constructors() {
        let msg = OutboundMessage::html(ChatId(7), "<b>hi</b>")
            .with_buttons(vec![Button::new("Yes", "confirm_yes")]);
        assert_eq!(msg.format, TextFormat::Html);
        assert_eq!(msg.buttons.len(), 1);
        assert_eq!(OutboundMessage::text(ChatId(7), "x").format, TextFormat::Plain);
    }
}
