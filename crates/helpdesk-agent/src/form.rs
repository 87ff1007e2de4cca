// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The intake form state machine.
//!
//! A [`FormSession`] moves through the [`Stage`]s in order, storing one
//! validated field per text stage, accumulating attachments, and ending in
//! a confirm/reject decision. It performs no I/O: the router turns each
//! [`Step`] into outbound messages.

use helpdesk_core::types::{AttachmentRef, IntakeForm, Stage};

use crate::validate::{self, ValidationError};

/// Callback data of the accept button.
pub const CONFIRM_YES: &str = "confirm_yes";
/// Callback data of the reject button.
pub const CONFIRM_NO: &str = "confirm_no";

/// One unit of conversant input, already classified.
#[derive(Debug, Clone, PartialEq)]
pub enum FormInput {
    Text(String),
    Attachment(AttachmentRef),
    /// `/skip` or `/done`.
    Skip,
    Choice(String),
}

/// Outcome of applying an input to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Field stored; the session now waits at the given stage.
    Advanced(Stage),
    /// Input failed validation; stage unchanged.
    Invalid(ValidationError),
    /// Input of the wrong kind for the current stage; stage unchanged.
    Reprompt(Stage),
    /// Attachment appended; carries the running count.
    AttachmentAdded(usize),
    /// Collection finished; the form must be shown for confirmation.
    ReadyToConfirm(IntakeForm),
    /// Conversant accepted the summary.
    Confirmed(IntakeForm),
    /// Conversant rejected the summary.
    Rejected,
    /// Input that means nothing at this stage (e.g. a stale button press).
    Ignored,
}

/// Per-conversant form state.
///
/// Fields are only written by their own stage, so every `Some` field belongs
/// to a stage that has already been passed.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSession {
    stage: Stage,
    organization: Option<String>,
    full_name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    topic: Option<String>,
    description: Option<String>,
    attachments: Vec<AttachmentRef>,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSession {
    /// A fresh session waiting for the organization.
    pub fn new() -> Self {
        Self::at_stage(Stage::AwaitingOrganization)
    }

    /// A session with no collected data parked at `stage`.
    pub(crate) fn at_stage(stage: Stage) -> Self {
        Self {
            stage,
            organization: None,
            full_name: None,
            phone: None,
            email: None,
            topic: None,
            description: None,
            attachments: Vec::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn attachments(&self) -> &[AttachmentRef] {
        &self.attachments
    }

    /// The completed form, once every text field has been collected.
    pub fn to_form(&self) -> Option<IntakeForm> {
        Some(IntakeForm {
            organization: self.organization.clone()?,
            full_name: self.full_name.clone()?,
            phone: self.phone.clone()?,
            email: self.email.clone()?,
            topic: self.topic.clone()?,
            description: self.description.clone()?,
            attachments: self.attachments.clone(),
        })
    }

    /// Applies one input and reports what happened.
    pub fn apply(&mut self, input: FormInput) -> Step {
        match self.stage {
            Stage::AwaitingAttachments => self.apply_attachment_stage(input),
            Stage::AwaitingConfirmation => self.apply_confirmation(input),
            Stage::AwaitingSupportResponse | Stage::Cancelled => Step::Ignored,
            stage => match input {
                FormInput::Text(text) => self.apply_text(stage, &text),
                FormInput::Choice(_) => Step::Ignored,
                FormInput::Attachment(_) | FormInput::Skip => Step::Reprompt(stage),
            },
        }
    }

    fn apply_text(&mut self, stage: Stage, text: &str) -> Step {
        let value = match validate::for_stage(stage, text) {
            Some(Ok(value)) => value,
            Some(Err(e)) => return Step::Invalid(e),
            None => return Step::Reprompt(stage),
        };

        let slot = match stage {
            Stage::AwaitingOrganization => &mut self.organization,
            Stage::AwaitingFullName => &mut self.full_name,
            Stage::AwaitingPhone => &mut self.phone,
            Stage::AwaitingEmail => &mut self.email,
            Stage::AwaitingTopic => &mut self.topic,
            Stage::AwaitingDescription => &mut self.description,
            _ => return Step::Reprompt(stage),
        };
        *slot = Some(value);

        match stage.next() {
            Some(next) => {
                self.stage = next;
                Step::Advanced(next)
            }
            None => Step::Ignored,
        }
    }

    fn apply_attachment_stage(&mut self, input: FormInput) -> Step {
        match input {
            FormInput::Attachment(attachment) => {
                self.attachments.push(attachment);
                Step::AttachmentAdded(self.attachments.len())
            }
            FormInput::Skip => match self.to_form() {
                Some(form) => {
                    self.stage = Stage::AwaitingConfirmation;
                    Step::ReadyToConfirm(form)
                }
                None => Step::Reprompt(Stage::AwaitingAttachments),
            },
            FormInput::Text(_) => Step::Reprompt(Stage::AwaitingAttachments),
            FormInput::Choice(_) => Step::Ignored,
        }
    }

    fn apply_confirmation(&mut self, input: FormInput) -> Step {
        match input {
            FormInput::Choice(data) if data == CONFIRM_YES => match self.to_form() {
                Some(form) => Step::Confirmed(form),
                None => Step::Ignored,
            },
            FormInput::Choice(data) if data == CONFIRM_NO => {
                self.stage = Stage::Cancelled;
                Step::Rejected
            }
            FormInput::Choice(_) => Step::Ignored,
            _ => Step::Reprompt(Stage::AwaitingConfirmation),
        }
    }
}
