// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversant-facing texts.

use helpdesk_core::markup::escape_html;
use helpdesk_core::types::{IssueKey, Stage};

pub const START: &str = "📋 Начнём оформление обращения.\nВведите название организации:";
pub const CANCELLED: &str = "🚫 Процесс отменён. /support для начала заново";
pub const REJECTED: &str = "❌ Отмена. /support для нового обращения";
pub const NO_SESSION: &str = "👋 Чтобы оформить обращение в техподдержку, введите /support";
pub const WAITING_FOR_REPLY: &str =
    "⏳ Ваша заявка уже в работе, ждите ответа техподдержки.\n/support для нового обращения";
pub const SUBMISSION_FAILED: &str =
    "⚠️ Не удалось создать заявку. Попробуйте позже: /support для начала заново";
pub const CONFIRM_BUTTON: &str = "✅ Подтвердить";
pub const REJECT_BUTTON: &str = "❌ Отменить";

/// The question asked when the session arrives at `stage`.
pub fn for_stage(stage: Stage) -> &'static str {
    match stage {
        Stage::AwaitingOrganization => "Введите название организации:",
        Stage::AwaitingFullName => "✍️ Введите ваше ФИО:",
        Stage::AwaitingPhone => "📞 Укажите номер телефона:",
        Stage::AwaitingEmail => "✉️ Введите e-mail:",
        Stage::AwaitingTopic => "📝 Тема обращения:",
        Stage::AwaitingDescription => "🖋 Опишите проблему подробно:",
        Stage::AwaitingAttachments => {
            "📎 Прикрепите файлы (скриншоты) или введите /skip, если их нет."
        }
        Stage::AwaitingConfirmation => "👆 Подтвердите или отмените обращение кнопками выше.",
        Stage::AwaitingSupportResponse => WAITING_FOR_REPLY,
        Stage::Cancelled => CANCELLED,
    }
}

/// Re-prompt for input of the wrong kind.
pub fn reprompt(stage: Stage) -> &'static str {
    match stage {
        Stage::AwaitingAttachments => "ℹ️ Прикрепите файл или введите /skip для продолжения.",
        Stage::AwaitingOrganization
        | Stage::AwaitingFullName
        | Stage::AwaitingPhone
        | Stage::AwaitingEmail
        | Stage::AwaitingTopic
        | Stage::AwaitingDescription => "ℹ️ Ожидается текстовый ответ.",
        other => for_stage(other),
    }
}

pub fn attachment_received(count: usize) -> String {
    format!("📎 Файл получен ({count}). Можете добавить ещё или введите /skip.")
}

/// Final acknowledgment. HTML.
pub fn ticket_created(key: &IssueKey) -> String {
    format!(
        "✅ Заявка создана: <b>{}</b>\nЖдите ответа техподдержки.",
        escape_html(&key.0)
    )
}

/// Tracker comment relayed to the conversant. Plain text.
pub fn support_reply(key: &IssueKey, text: &str) -> String {
    format!("📄 Ответ техподдержки по задаче {key}:\n\n{text}")
}

/// Admin-chat notice for a failed request email. HTML.
pub fn mail_failed(error: &str) -> String {
    format!("❗ Ошибка отправки письма: {}", escape_html(error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_text_stage_has_a_question() {
        let mut stage = Stage::AwaitingOrganization;
        while stage < Stage::AwaitingConfirmation {
            assert!(!for_stage(stage).is_empty());
            assert!(!reprompt(stage).is_empty());
            stage = stage.next().unwrap();
        }
    }

    #[test]
    fn start_ends_with_first_question() {
        assert!(START.ends_with(for_stage(Stage::AwaitingOrganization)));
    }

    #[test]
    fn ticket_ack_contains_key() {
        let text = ticket_created(&IssueKey("SUPPORT-42".into()));
        assert!(text.contains("<b>SUPPORT-42</b>"));
    }

    #[test]
    fn support_reply_format() {
        assert_eq!(
            support_reply(&IssueKey("SUPPORT-1".into()), "Fixed"),
            "📄 Ответ техподдержки по задаче SUPPORT-1:\n\nFixed"
        );
    }

    #[test]
    fn mail_failure_is_escaped() {
        assert_eq!(
            mail_failed("550 <rejected>"),
            "❗ Ошибка отправки письма: 550 &lt;rejected&gt;"
        );
    }
}
