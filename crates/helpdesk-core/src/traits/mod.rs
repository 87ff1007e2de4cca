// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Platform-facing adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod channel;
pub mod mail;
pub mod stage;
pub mod tracker;

pub use adapter::PluginAdapter;
pub use channel::ChannelAdapter;
pub use mail::MailTransport;
pub use stage::StageStore;
pub use tracker::TrackerAdapter;
