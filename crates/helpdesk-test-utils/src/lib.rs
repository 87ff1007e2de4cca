// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for helpdesk integration tests.
//!
//! Provides mock adapters and a test harness for fast, deterministic,
//! CI-runnable tests without Telegram, SMTP or the tracker.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock messaging channel with event injection and capture
//! - [`MockMailer`] - Mock mail transport capturing outgoing mail
//! - [`MockTracker`] - Mock ticketing system with scripted comments
//! - [`TestHarness`] - Full intake stack wired to the mocks

pub mod harness;
pub mod mock_channel;
pub mod mock_mailer;
pub mod mock_tracker;

pub use harness::TestHarness;
pub use mock_channel::MockChannel;
pub use mock_mailer::MockMailer;
pub use mock_tracker::MockTracker;
