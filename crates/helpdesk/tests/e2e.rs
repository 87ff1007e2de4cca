// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete intake pipeline.
//!
//! Each test creates an isolated TestHarness over mock adapters. Tests are
//! independent and order-insensitive.

use std::time::Duration;

use helpdesk_agent::form::CONFIRM_YES;
use helpdesk_agent::prompts;
use helpdesk_core::types::{ChatId, Comment, InboundContent, IssueKey, Stage, TextFormat};
use helpdesk_email::listener::relay;
use helpdesk_email::reply::{Disposition, parse_reply};
use helpdesk_email::smtp::build_message;
use helpdesk_test_utils::TestHarness;
use helpdesk_test_utils::harness::{ADMIN_CHAT, event};
use lettre::message::Mailbox;
use tokio_util::sync::CancellationToken;

const USER: ChatId = ChatId(42);
const BOT_ADDRESS: &str = "bot@example.com";

async fn submit(h: &TestHarness, chat: ChatId) {
    h.fill_form(chat).await.unwrap();
    h.send_file(chat, "error.png", "image/png", vec![0x89, 0x50])
        .await
        .unwrap();
    h.send_text(chat, "/skip").await.unwrap();
    h.press(chat, CONFIRM_YES).await.unwrap();
}

// ---- Request intake and fan-out ----

#[tokio::test]
async fn request_reaches_every_destination() {
    let h = TestHarness::default();
    submit(&h, USER).await;

    let created = h.tracker.created().await;
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].organization, "Acme");
    assert_eq!(created[0].attachments.len(), 1);

    let admin = h.last_message(ADMIN_CHAT).await.unwrap();
    assert!(admin.starts_with("📨 <b>Новое обращение</b>"));

    let mail = &h.mailer.sent().await[0];
    assert_eq!(mail.subject, "[user:42] Login issue");
    assert_eq!(mail.attachments[0].mime_major, "image");

    assert_eq!(
        h.tracker.uploads().await[0].1,
        "error.png".to_string()
    );
    assert_eq!(h.stage(USER).await, Some(Stage::AwaitingSupportResponse));
}

#[tokio::test]
async fn request_without_attachments() {
    let h = TestHarness::default();
    h.fill_form(USER).await.unwrap();
    h.send_text(USER, "/skip").await.unwrap();
    h.press(USER, CONFIRM_YES).await.unwrap();

    let admin: Vec<_> = h
        .channel
        .sent_messages()
        .await
        .into_iter()
        .filter(|m| m.chat_id == ADMIN_CHAT)
        .collect();
    assert_eq!(admin.len(), 1);
    for field in [
        "Acme",
        "Jane Doe",
        "+19995551234",
        "jane@acme.com",
        "Login issue",
        "Cannot log in since yesterday",
        "• Вложения: 0 файл(ов)",
    ] {
        assert!(admin[0].content.contains(field), "missing {field}");
    }

    let mails = h.mailer.sent().await;
    assert_eq!(mails.len(), 1);
    assert_eq!(mails[0].subject, "[user:42] Login issue");
    assert!(mails[0].attachments.is_empty());
    assert_eq!(h.stage(USER).await, Some(Stage::AwaitingSupportResponse));
}

#[tokio::test]
async fn concurrent_conversants_are_isolated() {
    let h = TestHarness::default();
    let other = ChatId(77);
    h.send_text(USER, "/support").await.unwrap();
    h.send_text(other, "/support").await.unwrap();
    h.send_text(USER, "Acme").await.unwrap();

    assert_eq!(h.stage(USER).await, Some(Stage::AwaitingFullName));
    assert_eq!(h.stage(other).await, Some(Stage::AwaitingOrganization));
}

#[tokio::test]
async fn without_admin_chat_only_email_and_tracker() {
    let h = TestHarness::builder().with_admin_chat(None).build();
    submit(&h, USER).await;

    assert!(h.last_message(ADMIN_CHAT).await.is_none());
    assert!(h.channel.sent_attachments().await.is_empty());
    assert_eq!(h.mailer.sent().await.len(), 1);
    assert_eq!(h.tracker.created().await.len(), 1);
}

// ---- Replies back to the conversant ----

#[tokio::test]
async fn tracker_reply_completes_the_cycle() {
    let h = TestHarness::default();
    submit(&h, USER).await;

    h.tracker
        .set_comments(
            &IssueKey("SUPPORT-1".into()),
            vec![Comment {
                id: 1,
                text: "Please restart the router".into(),
                created_at: chrono::Utc::now(),
            }],
        )
        .await;
    assert_eq!(h.poll().await, 1);
    assert_eq!(h.stage(USER).await, None);

    // A new request can be started afterwards.
    h.send_text(USER, "/support").await.unwrap();
    assert_eq!(h.stage(USER).await, Some(Stage::AwaitingOrganization));
}

#[tokio::test]
async fn reply_to_request_email_is_relayed() {
    let h = TestHarness::default();
    submit(&h, USER).await;
    let mail = h.mailer.sent().await.remove(0);

    let from: Mailbox = BOT_ADDRESS.parse().unwrap();
    let to: Mailbox = "admin@example.com".parse().unwrap();
    let own_copy = build_message(&from, &to, &mail).unwrap().formatted();
    assert!(matches!(
        parse_reply(&own_copy, &[BOT_ADDRESS]),
        Disposition::OwnMessage
    ));

    let answer = format!(
        "From: admin@example.com\r\nTo: {BOT_ADDRESS}\r\nSubject: Re: {}\r\n\r\nReset done.\r\n",
        mail.subject
    );
    let Disposition::Relay(reply) = parse_reply(answer.as_bytes(), &[BOT_ADDRESS]) else {
        panic!("reply should be relayed");
    };
    assert_eq!(reply.conversant, USER);

    relay(h.channel.as_ref(), &reply).await;
    let sent = h.channel.sent_messages().await;
    let last = sent.last().unwrap();
    assert_eq!(last.chat_id, USER);
    assert_eq!(last.format, TextFormat::Html);
    assert!(last.content.ends_with("Reset done."));
}

// ---- Intake loop ----

#[tokio::test]
async fn intake_loop_drives_injected_events() {
    let h = TestHarness::default();
    for text in ["/support", "Acme"] {
        h.channel
            .inject(event(USER, InboundContent::Text(text.into())))
            .await;
    }

    let cancel = CancellationToken::new();
    let intake = h.intake_loop();
    let wait = async {
        for _ in 0..100 {
            if h.stage(USER).await == Some(Stage::AwaitingFullName) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        cancel.cancel();
    };
    let (result, ()) = tokio::join!(intake.run(cancel.clone()), wait);

    assert!(result.is_ok());
    assert_eq!(h.stage(USER).await, Some(Stage::AwaitingFullName));
    assert_eq!(
        h.last_message(USER).await.as_deref(),
        Some(prompts::for_stage(Stage::AwaitingFullName))
    );
}
