// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-field validation rules for the intake form.
//!
//! Each validator returns the trimmed value on success. The error's
//! `Display` text is shown to the conversant as the re-prompt.

use std::sync::LazyLock;

use helpdesk_core::types::Stage;
use regex::Regex;
use thiserror::Error;

static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?\d{10,15}$").unwrap());

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+@[\w.-]+\.\w{2,}$").unwrap());

const MIN_TOPIC_CHARS: usize = 3;
const MIN_DESCRIPTION_CHARS: usize = 10;

/// Input rejected at a text stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("⚠️ Название организации не может быть пустым. Введите название организации:")]
    EmptyOrganization,

    #[error("⚠️ Укажите ФИО полностью (минимум фамилию и имя):")]
    IncompleteName,

    #[error("⚠️ Неверный формат телефона. Пример: +71234567890")]
    InvalidPhone,

    #[error("⚠️ Неверный e-mail. Пример: user@example.com")]
    InvalidEmail,

    #[error("⚠️ Тема слишком короткая (минимум 3 символа):")]
    TopicTooShort,

    #[error("⚠️ Опишите проблему подробнее (минимум 10 символов):")]
    DescriptionTooShort,
}

pub fn organization(input: &str) -> Result<String, ValidationError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyOrganization);
    }
    Ok(value.to_string())
}

/// At least two whitespace-separated words.
pub fn full_name(input: &str) -> Result<String, ValidationError> {
    let value = input.trim();
    if value.split_whitespace().count() < 2 {
        return Err(ValidationError::IncompleteName);
    }
    Ok(value.to_string())
}

pub fn phone(input: &str) -> Result<String, ValidationError> {
    let value = input.trim();
    if !PHONE.is_match(value) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(value.to_string())
}

pub fn email(input: &str) -> Result<String, ValidationError> {
    let value = input.trim();
    if !EMAIL.is_match(value) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(value.to_string())
}

pub fn topic(input: &str) -> Result<String, ValidationError> {
    let value = input.trim();
    if value.chars().count() < MIN_TOPIC_CHARS {
        return Err(ValidationError::TopicTooShort);
    }
    Ok(value.to_string())
}

pub fn description(input: &str) -> Result<String, ValidationError> {
    let value = input.trim();
    if value.chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(ValidationError::DescriptionTooShort);
    }
    Ok(value.to_string())
}

/// Validates free text for a text stage.
///
/// Returns `None` for stages that do not take free text.
pub fn for_stage(stage: Stage, input: &str) -> Option<Result<String, ValidationError>> {
    let result = match stage {
        Stage::AwaitingOrganization => organization(input),
        Stage::AwaitingFullName => full_name(input),
        Stage::AwaitingPhone => phone(input),
        Stage::AwaitingEmail => email(input),
        Stage::AwaitingTopic => topic(input),
        Stage::AwaitingDescription => description(input),
        _ => return None,
    };
    Some(result)
}
