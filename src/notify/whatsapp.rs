use crate::notify::metrics::DeliveryMetrics;
use crate::notify::rate_limit::SendRateLimiter;
use crate::notify::{Channel, ChannelSender, OutboundMessage, SendOutcome};
use std::sync::Arc;
use std::time::Duration;

pub struct TwilioWhatsAppSender {
    pub base_url: String,
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub status_callback_url: Option<String>,
    pub timeout_ms: u64,
    pub limiter: Arc<SendRateLimiter>,
    pub metrics: Arc<DeliveryMetrics>,
    pub client: reqwest::Client,
}

/// Canonical E.164 form for the numbers this deployment serves: a bare
/// 10-digit subscriber number gets the 91 country code, anything already
/// carrying 91 must be exactly 12 digits.
pub fn normalize_phone(raw: &str) -> Result<String, String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return Err("phone number is required".to_string());
    }
    if digits.len() < 10 || digits.len() > 15 {
        return Err(format!("invalid phone number length: {raw}"));
    }

    let digits = if digits.starts_with("91") {
        digits
    } else if digits.len() == 10 {
        format!("91{digits}")
    } else {
        return Err(format!(
            "invalid phone number: {raw}, include the country code or use a 10-digit number"
        ));
    };

    if digits.len() != 12 {
        return Err(format!("invalid Indian phone number: {raw}"));
    }

    Ok(format!("+{digits}"))
}

impl TwilioWhatsAppSender {
    pub async fn check_account(&self) -> bool {
        let url = format!("{}/2010-04-01/Accounts/{}.json", self.base_url, self.account_sid);
        self.client
            .get(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

#[async_trait::async_trait]
impl ChannelSender for TwilioWhatsAppSender {
    fn channel(&self) -> Channel {
        Channel::Whatsapp
    }

    async fn send(&self, message: &OutboundMessage) -> SendOutcome {
        let recipient = match normalize_phone(&message.recipient) {
            Ok(phone) => phone,
            Err(reason) => {
                self.metrics.mark_failed();
                return SendOutcome::InvalidRecipient { reason };
            }
        };

        if !self.limiter.try_acquire() {
            return SendOutcome::RateLimited;
        }

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );

        let mut form = vec![
            ("To", format!("whatsapp:{recipient}")),
            ("From", format!("whatsapp:{}", self.from_number)),
            ("Body", message.body.clone()),
        ];
        if let Some(media_url) = &message.media_url {
            form.push(("MediaUrl", media_url.clone()));
        }
        if let Some(callback) = &self.status_callback_url {
            form.push(("StatusCallback", callback.clone()));
        }

        let resp = self
            .client
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status().is_success() => {
                let v: serde_json::Value = r.json().await.unwrap_or_default();
                let message_id = v
                    .get("sid")
                    .and_then(|sid| sid.as_str())
                    .unwrap_or_default()
                    .to_string();
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
                    message: "messaging gateway timeout".to_string(),
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
