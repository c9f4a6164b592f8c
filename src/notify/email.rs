use crate::notify::metrics::DeliveryMetrics;
use crate::notify::{Channel, ChannelSender, OutboundMessage, SendOutcome};
use base64::Engine;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct SendGridEmailSender {
    pub base_url: String,
    pub api_key: String,
    pub from_email: String,
    pub timeout_ms: u64,
    pub metrics: Arc<DeliveryMetrics>,
    pub client: reqwest::Client,
}

pub fn validate_email(raw: &str) -> Result<String, String> {
    let addr = raw.trim();

    if addr.is_empty() {
        return Err("email address is required".to_string());
    }
    if addr.contains(char::is_whitespace) {
        return Err(format!("invalid email address: {raw}"));
    }
    let Some((local, domain)) = addr.split_once('@') else {
        return Err(format!("invalid email address: {raw}"));
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.contains('@') {
        return Err(format!("invalid email address: {raw}"));
    }

    Ok(addr.to_string())
}

impl SendGridEmailSender {
    /// A missing artifact degrades to sending without the attachment.
    async fn fetch_attachment(&self, url: &str) -> Option<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => match r.bytes().await {
                Ok(bytes) if !bytes.is_empty() => Some(bytes.to_vec()),
                _ => {
                    tracing::warn!("attachment at {} was empty, sending without it", url);
                    None
                }
            },
            _ => {
                tracing::warn!("failed to fetch attachment from {}, sending without it", url);
                None
            }
        }
    }
}

fn attachment_filename(url: &str) -> String {
    url.rsplit('/')
        .next()
        .filter(|name| name.ends_with(".pdf"))
        .map(str::to_string)
        .unwrap_or_else(|| "certificate.pdf".to_string())
}

#[async_trait::async_trait]
impl ChannelSender for SendGridEmailSender {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(&self, message: &OutboundMessage) -> SendOutcome {
        let recipient = match validate_email(&message.recipient) {
            Ok(addr) => addr,
            Err(reason) => {
                self.metrics.mark_failed();
                return SendOutcome::InvalidRecipient { reason };
            }
        };

        let mut payload = json!({
            "personalizations": [{ "to": [{ "email": recipient }] }],
            "from": { "email": self.from_email },
            "subject": message.subject.clone().unwrap_or_else(|| "Receipt".to_string()),
            "content": [{ "type": "text/html", "value": message.body }],
        });

        if let Some(media_url) = &message.media_url {
            if let Some(bytes) = self.fetch_attachment(media_url).await {
                payload["attachments"] = json!([{
                    "content": base64::engine::general_purpose::STANDARD.encode(&bytes),
                    "filename": attachment_filename(media_url),
                    "type": "application/pdf",
                    "disposition": "attachment",
                }]);
            }
        }

        let resp = self
            .client
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => {
                let message_id = r
                    .headers()
                    .get("x-message-id")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("sg_{}", Uuid::new_v4()));
                self.metrics.mark_sent();
                SendOutcome::Sent { message_id }
            }
            Ok(r) => {
                let status = r.status();
                let body = r.text().await.unwrap_or_default();
                self.metrics.mark_failed();
                SendOutcome::GatewayError {
                    code: Some(format!("HTTP_{}", status.as_u16())),
                    message: body.chars().take(200).collect(),
                }
            }
            Err(e) if e.is_timeout() => {
                self.metrics.mark_failed();
                SendOutcome::GatewayError {
                    code: Some("TIMEOUT".to_string()),
                    message: "email gateway timeout".to_string(),
                }
            }
            Err(e) => {
                self.metrics.mark_failed();
                SendOutcome::GatewayError {
                    code: Some("NETWORK_ERROR".to_string()),
                    message: e.to_string(),
                }
            }
        }
    }
}
