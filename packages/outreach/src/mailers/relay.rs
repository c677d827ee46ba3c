//! HTTP mail-relay client.
//!
//! Talks to a JSON relay with two endpoints:
//! `POST {base}/v1/messages` to dispatch, and
//! `GET {base}/v1/messages?from_address=<addr>` to list inbound messages
//! (newest first). Attachments travel base64-encoded in the send payload.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::MailError;
use crate::security::SecretString;
use crate::traits::mail::{MailTransport, MailboxReader, OutboundMail};

pub struct HttpMailRelay {
    base_url: String,
    api_key: SecretString,
    from: String,
    client: reqwest::Client,
}

impl HttpMailRelay {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<SecretString>,
        from: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            from: from.into(),
            client: reqwest::Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

#[derive(Serialize)]
struct SendPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<AttachmentPayload>,
}

#[derive(Serialize)]
struct AttachmentPayload {
    filename: String,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<InboundMessage>,
}

#[derive(Deserialize)]
struct InboundMessage {
    body: Option<String>,
}

#[async_trait]
impl MailTransport for HttpMailRelay {
    async fn send(&self, mail: &OutboundMail) -> Result<bool, MailError> {
        let attachment = mail.attachment.as_ref().map(|a| AttachmentPayload {
            filename: a.filename.clone(),
            content: base64::engine::general_purpose::STANDARD.encode(&a.bytes),
        });
        let payload = SendPayload {
            from: &self.from,
            to: &mail.to,
            subject: &mail.subject,
            text: &mail.body,
            attachment,
        };

        let response = self
            .client
            .post(self.messages_url())
            .bearer_auth(self.api_key.expose())
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Http(Box::new(e)))?;

        if response.status().is_success() {
            info!(target: "mail", to = %mail.to, "relay accepted message");
            Ok(true)
        } else {
            warn!(target: "mail", to = %mail.to, status = %response.status(), "relay refused message");
            Ok(false)
        }
    }
}

#[async_trait]
impl MailboxReader for HttpMailRelay {
    async fn probe(&self) -> Result<(), MailError> {
        let response = self
            .client
            .get(self.messages_url())
            .query(&[("limit", "1")])
            .bearer_auth(self.api_key.expose())
            .send()
            .await
            .map_err(|e| MailError::Http(Box::new(e)))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(MailError::Api {
                message: format!("mailbox probe returned {}", response.status()),
            })
        }
    }

    async fn has_reply_from(&self, address: &str) -> Result<bool, MailError> {
        let response = self
            .client
            .get(self.messages_url())
            .query(&[("from_address", address)])
            .bearer_auth(self.api_key.expose())
            .send()
            .await
            .map_err(|e| MailError::Http(Box::new(e)))?;
        if !response.status().is_success() {
            return Err(MailError::Api {
                message: format!("mailbox listing returned {}", response.status()),
            });
        }
        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| MailError::Http(Box::new(e)))?;
        Ok(!body.messages.is_empty())
    }

    async fn latest_body_from(&self, address: &str) -> Option<String> {
        let response = self
            .client
            .get(self.messages_url())
            .query(&[("from_address", address)])
            .bearer_auth(self.api_key.expose())
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body: MessagesResponse = response.json().await.ok()?;
        body.messages.into_iter().next().and_then(|m| m.body)
    }
}
