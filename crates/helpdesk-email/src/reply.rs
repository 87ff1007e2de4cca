// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of administrator replies.
//!
//! A reply is routed back to the conversant named either by the `X-Chat-Id`
//! header (kept by most clients when replying) or by the `[user:<id>]` tag in
//! the subject.

use std::sync::LazyLock;

use helpdesk_core::types::ChatId;
use mail_parser::{MessageParser, MimeHeaders};
use regex::Regex;
use tracing::debug;

static SUBJECT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)user[:\-](\d+)").expect("valid regex")
});

/// An administrator reply ready to be relayed.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminReply {
    pub conversant: ChatId,
    /// Plain-text body, trimmed. May be empty.
    pub body: String,
    /// `(filename, bytes)` in message order.
    pub attachments: Vec<(String, Vec<u8>)>,
}

/// What to do with one fetched message.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    Relay(AdminReply),
    /// Sent by the bot itself (e.g. a copy of the request email).
    OwnMessage,
    /// No conversant could be recovered, or the message did not parse.
    Unaddressed,
}

/// Extracts the conversant id from an `X-Chat-Id` header value.
///
/// Only all-digit values are accepted.
pub fn conversant_from_header(value: &str) -> Option<ChatId> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok().map(ChatId)
}

/// Extracts the conversant id from a subject such as `Re: [user:42] Login issue`.
pub fn conversant_from_subject(subject: &str) -> Option<ChatId> {
    SUBJECT_TAG
        .captures(subject)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .map(ChatId)
}

/// Classifies a raw RFC 822 message.
///
/// Every `From` address is compared case-insensitively against each of
/// `own_addresses`; a match means the bot sent the message itself.
pub fn parse_reply<S: AsRef<str>>(raw: &[u8], own_addresses: &[S]) -> Disposition {
    let Some(message) = MessageParser::default().parse(raw) else {
        debug!("unparsable message in mailbox");
        return Disposition::Unaddressed;
    };

    let own = message
        .from()
        .map(|from| {
            from.iter()
                .filter_map(|addr| addr.address())
                .any(|addr| {
                    own_addresses
                        .iter()
                        .any(|own| addr.eq_ignore_ascii_case(own.as_ref()))
                })
        })
        .unwrap_or(false);
    if own {
        return Disposition::OwnMessage;
    }

    let conversant = message
        .header("X-Chat-Id")
        .and_then(|value| value.as_text())
        .and_then(conversant_from_header)
        .or_else(|| message.subject().and_then(conversant_from_subject));
    let Some(conversant) = conversant else {
        debug!(subject = message.subject().unwrap_or_default(), "reply without conversant tag");
        return Disposition::Unaddressed;
    };

    let body = message
        .body_text(0)
        .map(|text| text.trim().to_string())
        .unwrap_or_default();

    let attachments = message
        .attachments()
        .map(|part| {
            (
                part.attachment_name().unwrap_or("file").to_string(),
                part.contents().to_vec(),
            )
        })
        .collect();

    Disposition::Relay(AdminReply {
        conversant,
        body,
        attachments,
    })
}
