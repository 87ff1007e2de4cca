// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update filtering and content extraction.
//!
//! Only private chats are processed. Messages and inline button presses are
//! turned into channel-agnostic [`InboundEvent`]s keyed by the conversant.

use helpdesk_core::types::{
    AttachmentKind, AttachmentRef, ChatId, InboundContent, InboundEvent,
};
use teloxide::types::{CallbackQuery, ChatKind, Message};

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Extracts content from a Telegram message.
///
/// Text, photos and documents are supported. Photos reference the largest
/// size variant. Returns `None` for anything else (stickers, voice, ...).
pub fn extract_content(msg: &Message) -> Option<InboundContent> {
    if let Some(text) = msg.text() {
        return Some(InboundContent::Text(text.to_string()));
    }

    if let Some(largest) = msg.photo().and_then(|photos| photos.last()) {
        return Some(InboundContent::Attachment(AttachmentRef {
            kind: AttachmentKind::Photo,
            file_id: largest.file.id.to_string(),
            filename: format!("photo_{}.jpg", msg.id.0),
            mime_type: "image/jpeg".to_string(),
        }));
    }

    if let Some(doc) = msg.document() {
        return Some(InboundContent::Attachment(AttachmentRef {
            kind: AttachmentKind::Document,
            file_id: doc.file.id.to_string(),
            filename: doc
                .file_name
                .clone()
                .unwrap_or_else(|| "document".to_string()),
            mime_type: doc
                .mime_type
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string()),
        }));
    }

    None
}

/// Converts a Telegram message and extracted content into an [`InboundEvent`].
pub fn to_inbound_event(msg: &Message, content: InboundContent) -> InboundEvent {
    InboundEvent {
        chat_id: ChatId(msg.chat.id.0),
        content,
        timestamp: chrono::DateTime::to_rfc3339(&msg.date),
    }
}

/// Converts an inline button press into a [`InboundContent::Choice`] event.
///
/// The conversant is the user who pressed the button; in a private chat
/// that is also the chat id. Presses without callback data are ignored.
pub fn callback_to_event(query: &CallbackQuery) -> Option<InboundEvent> {
    let data = query.data.clone()?;
    Some(InboundEvent {
        chat_id: ChatId(query.from.id.0 as i64),
        content: InboundContent::Choice(data),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn private_message(extra: serde_json::Value) -> Message {
        let mut json = serde_json::json!({
            "message_id": 17,
            "date": 1700000000i64,
            "chat": {
                "id": 12345i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": {
                "id": 12345u64,
                "is_bot": false,
                "first_name": "Test",
            },
        });
        if let (Some(obj), Some(extra)) = (json.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                obj.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn group_message(text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": -100123i64,
                "type": "supergroup",
                "title": "Support",
            },
            "from": {
                "id": 12345u64,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
        });
        serde_json::from_value(json).expect("failed to deserialize mock group message")
    }

    #[test]
    fn is_dm_private_chat() {
        let msg = private_message(serde_json::json!({"text": "hello"}));
        assert!(is_dm(&msg));
    }

    #[test]
    fn is_dm_group_chat() {
        assert!(!is_dm(&group_message("hello")));
    }

    #[test]
    fn text_is_extracted() {
        let msg = private_message(serde_json::json!({"text": "/start"}));
        assert_eq!(
            extract_content(&msg),
            Some(InboundContent::Text("/start".into()))
        );
    }

    #[test]
    fn photo_uses_largest_size() {
        let msg = private_message(serde_json::json!({
            "photo": [
                {"file_id": "small", "file_unique_id": "s", "width": 90, "height": 90, "file_size": 100},
                {"file_id": "large", "file_unique_id": "l", "width": 1280, "height": 960, "file_size": 9000}
            ]
        }));
        match extract_content(&msg) {
            Some(InboundContent::Attachment(att)) => {
                assert_eq!(att.kind, AttachmentKind::Photo);
                assert_eq!(att.file_id, "large");
                assert_eq!(att.filename, "photo_17.jpg");
                assert_eq!(att.mime_type, "image/jpeg");
            }
            other => panic!("expected photo attachment, got {other:?}"),
        }
    }

    #[test]
    fn document_keeps_name_and_mime() {
        let msg = private_message(serde_json::json!({
            "document": {
                "file_id": "doc1",
                "file_unique_id": "d1",
                "file_name": "report.pdf",
                "mime_type": "application/pdf",
                "file_size": 2048
            }
        }));
        match extract_content(&msg) {
            Some(InboundContent::Attachment(att)) => {
                assert_eq!(att.kind, AttachmentKind::Document);
                assert_eq!(att.filename, "report.pdf");
                assert_eq!(att.mime_parts(), ("application", "pdf"));
            }
            other => panic!("expected document attachment, got {other:?}"),
        }
    }

    #[test]
    fn document_without_metadata_gets_defaults() {
        let msg = private_message(serde_json::json!({
            "document": {"file_id": "doc2", "file_unique_id": "d2", "file_size": 1}
        }));
        match extract_content(&msg) {
            Some(InboundContent::Attachment(att)) => {
                assert_eq!(att.filename, "document");
                assert_eq!(att.mime_type, "application/octet-stream");
            }
            other => panic!("expected document attachment, got {other:?}"),
        }
    }

    #[test]
    fn location_is_unsupported() {
        let msg = private_message(serde_json::json!({
            "location": {"latitude": 55.75, "longitude": 37.61}
        }));
        assert!(extract_content(&msg).is_none());
    }

    #[test]
    fn inbound_event_is_keyed_by_chat() {
        let msg = private_message(serde_json::json!({"text": "Acme"}));
        let event = to_inbound_event(&msg, InboundContent::Text("Acme".into()));
        assert_eq!(event.chat_id, ChatId(12345));
        assert!(event.timestamp.starts_with("2023-11-14"));
    }

    #[test]
    fn callback_becomes_choice() {
        let query: CallbackQuery = serde_json::from_value(serde_json::json!({
            "id": "cb1",
            "from": {"id": 777u64, "is_bot": false, "first_name": "Test"},
            "chat_instance": "ci",
            "data": "confirm_yes"
        }))
        .expect("failed to deserialize callback query");
        let event = callback_to_event(&query).unwrap();
        assert_eq!(event.chat_id, ChatId(777));
        assert_eq!(event.content, InboundContent::Choice("confirm_yes".into()));
    }
}
