// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File transfer helpers for Telegram.
//!
//! Collected attachments are kept as file ids; bytes are only fetched when
//! a file has to leave the platform (email, tracker upload).

use helpdesk_core::error::HelpdeskError;
use helpdesk_core::types::{AttachmentKind, AttachmentRef};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile};
use tracing::debug;

/// Downloads a file from Telegram servers by its file id.
///
/// Uses the Bot API's `getFile` to resolve the file path, then downloads
/// the file content as bytes.
pub async fn download_file(bot: &Bot, file_id: &str) -> Result<Vec<u8>, HelpdeskError> {
    let file = bot
        .get_file(FileId(file_id.to_string()))
        .await
        .map_err(|e| HelpdeskError::Channel {
            message: format!("failed to get file info: {e}"),
            source: Some(Box::new(e)),
        })?;

    let mut buf = Vec::new();
    bot.download_file(&file.path, &mut buf)
        .await
        .map_err(|e| HelpdeskError::Channel {
            message: format!("failed to download file: {e}"),
            source: Some(Box::new(e)),
        })?;

    debug!(file_id, size = buf.len(), "downloaded file from Telegram");
    Ok(buf)
}

/// Re-sends a stored attachment by reference, as a photo or a document
/// depending on how it arrived.
pub async fn resend(
    bot: &Bot,
    chat_id: teloxide::types::ChatId,
    attachment: &AttachmentRef,
) -> Result<Message, HelpdeskError> {
    let input = InputFile::file_id(FileId(attachment.file_id.clone()));
    let sent = match attachment.kind {
        AttachmentKind::Photo => bot.send_photo(chat_id, input).await,
        AttachmentKind::Document => bot.send_document(chat_id, input).await,
    };
    sent.map_err(|e| HelpdeskError::Channel {
        message: format!("failed to forward {}: {e}", attachment.filename),
        source: Some(Box::new(e)),
    })
}

/// Uploads raw bytes as a named document.
pub async fn upload_document(
    bot: &Bot,
    chat_id: teloxide::types::ChatId,
    filename: &str,
    data: Vec<u8>,
) -> Result<Message, HelpdeskError> {
    let input = InputFile::memory(data).file_name(filename.to_string());
    bot.send_document(chat_id, input)
        .await
        .map_err(|e| HelpdeskError::Channel {
            message: format!("failed to upload {filename}: {e}"),
            source: Some(Box::new(e)),
        })
}
