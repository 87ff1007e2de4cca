// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email side of the helpdesk intake bot.
//!
//! - [`smtp::SmtpMailer`] implements [`MailTransport`](helpdesk_core::MailTransport)
//!   and sends new requests to the administrators with their attachments.
//! - [`listener::ReplyListener`] polls the mailbox over IMAP and relays
//!   administrator replies back to the conversant.

pub mod listener;
pub mod reply;
pub mod smtp;

pub use listener::ReplyListener;
pub use smtp::SmtpMailer;
