// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! IMAP reply listener.
//!
//! Every cycle logs into the mailbox over TLS and walks the `UNSEEN`
//! messages of INBOX one at a time: administrator replies are relayed to
//! their conversant, then the message is flagged `\Seen`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use helpdesk_config::model::{ImapConfig, SmtpConfig};
use helpdesk_core::error::HelpdeskError;
use helpdesk_core::markup::escape_html;
use helpdesk_core::traits::ChannelAdapter;
use helpdesk_core::types::OutboundMessage;
use lettre::message::Mailbox;
use rustls_pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::reply::{AdminReply, Disposition, parse_reply};

fn imap_error(context: &str, e: impl std::fmt::Display) -> HelpdeskError {
    HelpdeskError::Mail {
        message: format!("{context}: {e}"),
        source: None,
    }
}

/// Renders the chat message for a relayed reply.
pub fn reply_text(body: &str) -> String {
    let body = if body.is_empty() {
        "(без текста)".to_string()
    } else {
        escape_html(body)
    };
    format!("✉️ <b>Ответ администратора</b>:\n\n{body}")
}

/// Message access the listener needs from an open mailbox.
#[async_trait]
pub trait UnseenMailbox: Send {
    /// Sequence numbers of the `UNSEEN` messages.
    async fn unseen(&mut self) -> Result<Vec<u32>, HelpdeskError>;

    /// Raw RFC 822 bodies stored under `seq`.
    async fn fetch(&mut self, seq: u32) -> Result<Vec<Vec<u8>>, HelpdeskError>;

    /// Flags `seq` as `\Seen`.
    async fn mark_seen(&mut self, seq: u32) -> Result<(), HelpdeskError>;
}

type TlsSession = async_imap::Session<TlsStream<TcpStream>>;

/// An INBOX selected over a TLS IMAP session.
struct ImapMailbox {
    session: TlsSession,
}

impl ImapMailbox {
    async fn logout(mut self) {
        if let Err(e) = self.session.logout().await {
            warn!(error = %e, "IMAP logout failed");
        }
    }
}

#[async_trait]
impl UnseenMailbox for ImapMailbox {
    async fn unseen(&mut self) -> Result<Vec<u32>, HelpdeskError> {
        let unseen = self
            .session
            .search("UNSEEN")
            .await
            .map_err(|e| imap_error("IMAP search failed", e))?;
        Ok(unseen.into_iter().collect())
    }

    async fn fetch(&mut self, seq: u32) -> Result<Vec<Vec<u8>>, HelpdeskError> {
        let fetches: Vec<_> = self
            .session
            .fetch(seq.to_string(), "RFC822")
            .await
            .map_err(|e| imap_error("IMAP fetch failed", e))?
            .try_collect()
            .await
            .map_err(|e| imap_error("IMAP fetch failed", e))?;
        Ok(fetches
            .iter()
            .filter_map(|fetch| fetch.body().map(<[u8]>::to_vec))
            .collect())
    }

    async fn mark_seen(&mut self, seq: u32) -> Result<(), HelpdeskError> {
        let _: Vec<_> = self
            .session
            .store(seq.to_string(), "+FLAGS (\\Seen)")
            .await
            .map_err(|e| imap_error("IMAP store failed", e))?
            .try_collect()
            .await
            .map_err(|e| imap_error("IMAP store failed", e))?;
        Ok(())
    }
}

/// Processes the unseen messages in sequence order. Returns the number of
/// replies relayed.
///
/// Each message is relayed before it is flagged `\Seen`, so a failure part
/// way through leaves the earlier messages handled and the rest unseen for
/// the next cycle.
pub async fn drain_unseen<M, S>(
    mailbox: &mut M,
    channel: &dyn ChannelAdapter,
    own_addresses: &[S],
) -> Result<usize, HelpdeskError>
where
    M: UnseenMailbox + ?Sized,
    S: AsRef<str> + Sync,
{
    let mut seqs = mailbox.unseen().await?;
    seqs.sort_unstable();

    let mut relayed = 0;
    for seq in seqs {
        let step = async {
            for raw in mailbox.fetch(seq).await? {
                match parse_reply(&raw, own_addresses) {
                    Disposition::Relay(reply) => {
                        relay(channel, &reply).await;
                        relayed += 1;
                    }
                    Disposition::OwnMessage => debug!(seq, "skipping message sent by the bot"),
                    Disposition::Unaddressed => debug!(seq, "skipping message without conversant"),
                }
            }
            mailbox.mark_seen(seq).await
        };
        if let Err(e) = step.await {
            warn!(seq, relayed, "mailbox scan interrupted");
            return Err(e);
        }
    }
    Ok(relayed)
}

/// Polls the support mailbox and relays replies through the channel.
pub struct ReplyListener {
    host: String,
    port: u16,
    username: String,
    password: String,
    /// Addresses the bot sends from; mail from these is never relayed.
    own_addresses: Vec<String>,
    interval: Duration,
    channel: Arc<dyn ChannelAdapter>,
}

impl ReplyListener {
    /// Creates a listener from the `[imap]` section.
    ///
    /// Missing IMAP credentials fall back to the SMTP ones.
    pub fn new(
        imap: &ImapConfig,
        smtp: &SmtpConfig,
        channel: Arc<dyn ChannelAdapter>,
    ) -> Result<Self, HelpdeskError> {
        let username = imap
            .username
            .clone()
            .or_else(|| smtp.username.clone())
            .ok_or_else(|| HelpdeskError::Config("imap.username is required".into()))?;
        let password = imap
            .password
            .clone()
            .or_else(|| smtp.password.clone())
            .ok_or_else(|| HelpdeskError::Config("imap.password is required".into()))?;

        let mut own_addresses = vec![username.clone()];
        if let Some(sender) = smtp.sender() {
            // `from` may carry a display name.
            let address = sender
                .parse::<Mailbox>()
                .map(|mailbox| mailbox.email.to_string())
                .unwrap_or_else(|_| sender.to_string());
            if !own_addresses
                .iter()
                .any(|own| own.eq_ignore_ascii_case(&address))
            {
                own_addresses.push(address);
            }
        }

        Ok(Self {
            host: imap.host.clone(),
            port: imap.port,
            username,
            password,
            own_addresses,
            interval: Duration::from_secs(imap.poll_interval_secs.max(1)),
            channel,
        })
    }

    /// Runs until `cancel` fires. Failed cycles are logged and retried on the
    /// next tick.
    pub async fn run(self, cancel: CancellationToken) {
        info!(host = self.host, interval_secs = self.interval.as_secs(), "email reply listener started");
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    match self.check_once().await {
                        Ok(0) => {}
                        Ok(n) => info!(relayed = n, "administrator replies relayed"),
                        Err(e) => error!(error = %e, "email check failed"),
                    }
                }
            }
        }
        info!("email reply listener stopped");
    }

    /// One mailbox scan. Returns the number of replies relayed.
    pub async fn check_once(&self) -> Result<usize, HelpdeskError> {
        let mut mailbox = self.open_inbox().await?;
        let result = drain_unseen(&mut mailbox, self.channel.as_ref(), &self.own_addresses).await;
        mailbox.logout().await;
        result
    }

    /// Logs in over TLS and selects INBOX.
    async fn open_inbox(&self) -> Result<ImapMailbox, HelpdeskError> {
        let mut roots = rustls::RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        // Explicit provider: several crypto backends may be linked in.
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let tls_config = rustls::ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| imap_error("TLS setup failed", e))?
            .with_root_certificates(roots)
            .with_no_client_auth();
        let connector = TlsConnector::from(Arc::new(tls_config));

        let server_name = ServerName::try_from(self.host.clone())
            .map_err(|e| imap_error("invalid IMAP host", e))?;
        let tcp = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| imap_error("IMAP connect failed", e))?;
        let tls = connector
            .connect(server_name, tcp)
            .await
            .map_err(|e| imap_error("IMAP TLS handshake failed", e))?;

        let client = async_imap::Client::new(tls);
        let session = client
            .login(&self.username, &self.password)
            .await
            .map_err(|(e, _)| imap_error("IMAP login failed", e))?;

        let mut mailbox = ImapMailbox { session };
        if let Err(e) = mailbox.session.select("INBOX").await {
            mailbox.logout().await;
            return Err(imap_error("IMAP select failed", e));
        }
        Ok(mailbox)
    }
}

/// Sends a reply to its conversant: the text first, then each attachment.
///
/// Failures are logged per item.
pub async fn relay(channel: &dyn ChannelAdapter, reply: &AdminReply) {
    let msg = OutboundMessage::html(reply.conversant, reply_text(&reply.body));
    if let Err(e) = channel.send(msg).await {
        warn!(chat_id = %reply.conversant, error = %e, "failed to relay administrator reply");
    }
    for (filename, data) in &reply.attachments {
        if let Err(e) = channel
            .send_file(reply.conversant, filename, data.clone())
            .await
        {
            warn!(chat_id = %reply.conversant, filename, error = %e, "failed to relay reply attachment");
        }
    }
}
