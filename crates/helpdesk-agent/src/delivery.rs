// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fan-out of a confirmed form.
//!
//! Order: administrator chat, email, tracker issue, issue attachments.
//! Chat and email failures are logged (email failures are also reported to
//! the administrator chat) and never abort the submission. Only issue
//! creation can fail it.

use std::sync::Arc;

use helpdesk_core::error::HelpdeskError;
use helpdesk_core::traits::{ChannelAdapter, MailTransport, TrackerAdapter};
use helpdesk_core::types::{
    AttachmentRef, ChatId, IntakeForm, IssueKey, MailAttachment, OutboundMessage, OutgoingMail,
};
use tracing::{error, info, warn};

use crate::{prompts, summary};

/// Delivers confirmed forms to administrators and the tracker.
pub struct Delivery {
    channel: Arc<dyn ChannelAdapter>,
    mailer: Arc<dyn MailTransport>,
    tracker: Arc<dyn TrackerAdapter>,
    /// `None` disables the chat notification.
    admin_chat: Option<ChatId>,
}

impl Delivery {
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        mailer: Arc<dyn MailTransport>,
        tracker: Arc<dyn TrackerAdapter>,
        admin_chat: Option<ChatId>,
    ) -> Self {
        Self {
            channel,
            mailer,
            tracker,
            admin_chat,
        }
    }

    /// Delivers `form` and returns the key of the opened issue.
    pub async fn submit(
        &self,
        conversant: ChatId,
        form: &IntakeForm,
    ) -> Result<IssueKey, HelpdeskError> {
        self.notify_admin_chat(conversant, form).await;

        let files = self.download_all(&form.attachments).await;
        self.send_email(conversant, form, &files).await;

        let key = self.tracker.create_issue(form).await?;
        info!(chat_id = %conversant, ticket = %key, "request submitted");

        for (attachment, data) in files {
            if let Err(e) = self
                .tracker
                .upload_attachment(&key, data, &attachment.filename)
                .await
            {
                warn!(ticket = %key, filename = attachment.filename, error = %e, "failed to upload attachment");
            }
        }
        Ok(key)
    }

    async fn notify_admin_chat(&self, conversant: ChatId, form: &IntakeForm) {
        let Some(admin) = self.admin_chat else {
            warn!("admin chat not configured, skipping chat notification");
            return;
        };

        let text = summary::admin_notification(conversant, form);
        if let Err(e) = self.channel.send(OutboundMessage::html(admin, text)).await {
            error!(chat_id = %admin, error = %e, "failed to notify admin chat");
        }
        for attachment in &form.attachments {
            if let Err(e) = self.channel.send_attachment(admin, attachment).await {
                error!(filename = attachment.filename, error = %e, "failed to forward attachment to admin chat");
            }
        }
    }

    /// Fetches every attachment once; the bytes feed both the email and the
    /// issue. Files that fail to download are left out of both.
    async fn download_all(&self, attachments: &[AttachmentRef]) -> Vec<(AttachmentRef, Vec<u8>)> {
        let mut files = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            match self.channel.download(attachment).await {
                Ok(data) => files.push((attachment.clone(), data)),
                Err(e) => {
                    warn!(filename = attachment.filename, error = %e, "failed to download attachment");
                }
            }
        }
        files
    }

    async fn send_email(
        &self,
        conversant: ChatId,
        form: &IntakeForm,
        files: &[(AttachmentRef, Vec<u8>)],
    ) {
        let attachments = files
            .iter()
            .map(|(attachment, data)| {
                let (major, minor) = attachment.mime_parts();
                MailAttachment {
                    filename: attachment.filename.clone(),
                    mime_major: major.to_string(),
                    mime_minor: minor.to_string(),
                    data: data.clone(),
                }
            })
            .collect();
        let mail = OutgoingMail::tagged(
            conversant,
            &form.topic,
            summary::email_body(conversant, form),
            attachments,
        );

        if let Err(e) = self.mailer.send_mail(mail).await {
            error!(chat_id = %conversant, error = %e, "failed to send request email");
            if let Some(admin) = self.admin_chat {
                let notice = OutboundMessage::html(admin, prompts::mail_failed(&e.to_string()));
                if let Err(e) = self.channel.send(notice).await {
                    error!(error = %e, "failed to report email failure to admin chat");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_core::types::AttachmentKind;
    use helpdesk_test_utils::{MockChannel, MockMailer, MockTracker};

    const USER: ChatId = ChatId(42);
    const ADMIN: ChatId = ChatId(-100500);

    fn attachment(id: &str, kind: AttachmentKind, mime: &str) -> AttachmentRef {
        AttachmentRef {
            kind,
            file_id: id.into(),
            filename: format!("{id}.bin"),
            mime_type: mime.into(),
        }
    }

    fn form(attachments: Vec<AttachmentRef>) -> IntakeForm {
        IntakeForm {
            organization: "Acme".into(),
            full_name: "Jane Doe".into(),
            phone: "+19995551234".into(),
            email: "jane@acme.com".into(),
            topic: "Login issue".into(),
            description: "Cannot log in since yesterday".into(),
            attachments,
        }
    }

    struct Fixture {
        channel: Arc<MockChannel>,
        mailer: Arc<MockMailer>,
        tracker: Arc<MockTracker>,
        delivery: Delivery,
    }

    fn fixture(admin_chat: Option<ChatId>) -> Fixture {
        let channel = Arc::new(MockChannel::new());
        let mailer = Arc::new(MockMailer::new());
        let tracker = Arc::new(MockTracker::new());
        let delivery = Delivery::new(channel.clone(), mailer.clone(), tracker.clone(), admin_chat);
        Fixture {
            channel,
            mailer,
            tracker,
            delivery,
        }
    }

    #[tokio::test]
    async fn attachments_forwarded_and_mailed_in_order() {
        let f = fixture(Some(ADMIN));
        let atts = vec![
            attachment("A", AttachmentKind::Photo, "image/jpeg"),
            attachment("B", AttachmentKind::Document, "application/pdf"),
            attachment("C", AttachmentKind::Document, ""),
        ];
        for att in &atts {
            f.channel.set_file(&att.file_id, att.file_id.as_bytes().to_vec()).await;
        }

        let key = f.delivery.submit(USER, &form(atts)).await.unwrap();

        let forwarded: Vec<_> = f
            .channel
            .sent_attachments()
            .await
            .into_iter()
            .map(|(chat, att)| (chat, att.file_id))
            .collect();
        assert_eq!(
            forwarded,
            [(ADMIN, "A".to_string()), (ADMIN, "B".to_string()), (ADMIN, "C".to_string())]
        );

        let mails = f.mailer.sent().await;
        assert_eq!(mails.len(), 1);
        let names: Vec<_> = mails[0].attachments.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, ["A.bin", "B.bin", "C.bin"]);
        assert_eq!(mails[0].attachments[1].mime_minor, "pdf");
        assert_eq!(mails[0].attachments[2].mime_major, "application");
        assert_eq!(mails[0].attachments[2].mime_minor, "octet-stream");

        let uploads = f.tracker.uploads().await;
        let uploaded: Vec<_> = uploads.iter().map(|(k, name, _)| (k.clone(), name.clone())).collect();
        assert_eq!(
            uploaded,
            [
                (key.clone(), "A.bin".to_string()),
                (key.clone(), "B.bin".to_string()),
                (key, "C.bin".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn email_tagged_with_conversant() {
        let f = fixture(Some(ADMIN));
        f.delivery.submit(USER, &form(vec![])).await.unwrap();

        let mails = f.mailer.sent().await;
        assert_eq!(mails[0].subject, "[user:42] Login issue");
        assert_eq!(mails[0].conversant, USER);
        assert!(mails[0].body.contains("• Вложения: 0 файл(ов)"));
        assert!(!mails[0].body.contains("<b>"));
    }

    #[tokio::test]
    async fn email_failure_reported_to_admin_and_flow_continues() {
        let f = fixture(Some(ADMIN));
        f.mailer.fail_with("535 authentication failed").await;

        let result = f.delivery.submit(USER, &form(vec![])).await;
        assert!(result.is_ok());

        let sent = f.channel.sent_messages().await;
        assert_eq!(sent.len(), 2);
        assert!(sent[1].content.starts_with("❗ Ошибка отправки письма:"));
        assert!(sent[1].content.contains("535 authentication failed"));
        assert_eq!(f.tracker.created().await.len(), 1);
    }

    #[tokio::test]
    async fn chat_failure_does_not_abort() {
        let f = fixture(Some(ADMIN));
        f.channel.fail_sends(true).await;
        assert!(f.delivery.submit(USER, &form(vec![])).await.is_ok());
        assert_eq!(f.mailer.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn issue_creation_failure_propagates() {
        let f = fixture(Some(ADMIN));
        f.tracker.fail_create(true).await;
        let err = f.delivery.submit(USER, &form(vec![])).await.unwrap_err();
        assert!(matches!(err, HelpdeskError::Tracker { .. }));
        // Chat and email went out before the tracker call.
        assert_eq!(f.channel.sent_count().await, 1);
        assert_eq!(f.mailer.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn upload_failure_is_tolerated() {
        let f = fixture(Some(ADMIN));
        f.tracker.fail_uploads(true).await;
        let att = attachment("A", AttachmentKind::Photo, "image/jpeg");
        f.channel.set_file("A", vec![1, 2, 3]).await;
        assert!(f.delivery.submit(USER, &form(vec![att])).await.is_ok());
    }

    #[tokio::test]
    async fn failed_download_is_left_out() {
        let f = fixture(Some(ADMIN));
        let atts = vec![
            attachment("A", AttachmentKind::Photo, "image/jpeg"),
            attachment("missing", AttachmentKind::Document, "text/plain"),
        ];
        f.channel.set_file("A", vec![1]).await;

        f.delivery.submit(USER, &form(atts)).await.unwrap();
        assert_eq!(f.mailer.sent().await[0].attachments.len(), 1);
        assert_eq!(f.tracker.uploads().await.len(), 1);
    }

    #[tokio::test]
    async fn no_admin_chat_skips_notification() {
        let f = fixture(None);
        f.delivery.submit(USER, &form(vec![])).await.unwrap();
        assert_eq!(f.channel.sent_count().await, 0);
        assert_eq!(f.mailer.sent().await.len(), 1);
    }
}
