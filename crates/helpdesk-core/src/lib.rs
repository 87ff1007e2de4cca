// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the helpdesk intake bot.
//!
//! This crate provides the collaborator traits, error type, and shared types
//! used throughout the workspace. Every adapter implements traits defined here.

pub mod error;
pub mod markup;
pub mod traits;
pub mod types;

pub use error::HelpdeskError;
pub use types::{AdapterType, ChatId, HealthStatus, IssueKey, MessageId, Stage};

pub use traits::{ChannelAdapter, MailTransport, PluginAdapter, StageStore, TrackerAdapter};
