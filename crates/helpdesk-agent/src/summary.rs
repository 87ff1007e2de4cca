// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-format rendering of a collected form.
//!
//! All renderings are Telegram HTML with user values escaped; the email body
//! is the admin rendering with markup stripped.

use helpdesk_core::markup::{escape_html, strip_html};
use helpdesk_core::types::{ChatId, IntakeForm};

/// The six text fields and the attachment count, one bullet per line.
pub fn field_lines(form: &IntakeForm) -> String {
    format!(
        "• Организация: {}\n\
         • ФИО: {}\n\
         • Телефон: {}\n\
         • E-mail: {}\n\
         • Тема: {}\n\
         • Описание: {}\n\
         • Вложения: {} файл(ов)",
        escape_html(&form.organization),
        escape_html(&form.full_name),
        escape_html(&form.phone),
        escape_html(&form.email),
        escape_html(&form.topic),
        escape_html(&form.description),
        form.attachments.len(),
    )
}

/// Shown to the conversant together with the confirm/reject buttons.
pub fn review(form: &IntakeForm) -> String {
    format!("👀 Проверьте данные:\n{}", field_lines(form))
}

/// Posted to the administrator chat.
pub fn admin_notification(conversant: ChatId, form: &IntakeForm) -> String {
    format!(
        "📨 <b>Новое обращение</b> от пользователя <code>{conversant}</code>\n\n{}",
        field_lines(form)
    )
}

/// Plain-text email body.
pub fn email_body(conversant: ChatId, form: &IntakeForm) -> String {
    strip_html(&admin_notification(conversant, form))
}
