use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod dispatcher;
pub mod email;
pub mod metrics;
pub mod rate_limit;
pub mod templates;
pub mod whatsapp;
pub mod worker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Whatsapp,
    Email,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Whatsapp => "WHATSAPP",
            Channel::Email => "EMAIL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "WHATSAPP" => Some(Channel::Whatsapp),
            "EMAIL" => Some(Channel::Email),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Normal,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Priority::High),
            "normal" => Some(Priority::Normal),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub recipient: String,
    pub subject: Option<String>,
    pub body: String,
    pub media_url: Option<String>,
    pub priority: Priority,
}

/// Normalized result of one send attempt. Senders map every failure mode
/// into an outcome instead of erroring so that one channel can never abort
/// its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent { message_id: String },
    InvalidRecipient { reason: String },
    RateLimited,
    GatewayError { code: Option<String>, message: String },
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent { .. })
    }

    pub fn error_code(&self) -> Option<String> {
        match self {
            SendOutcome::Sent { .. } => None,
            SendOutcome::InvalidRecipient { .. } => Some("INVALID_RECIPIENT".to_string()),
            SendOutcome::RateLimited => Some("RATE_LIMITED".to_string()),
            SendOutcome::GatewayError { code, .. } => {
                Some(code.clone().unwrap_or_else(|| "GATEWAY_ERROR".to_string()))
            }
        }
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            SendOutcome::Sent { .. } => None,
            SendOutcome::InvalidRecipient { reason } => Some(reason.clone()),
            SendOutcome::RateLimited => Some("send rate limit exceeded".to_string()),
            SendOutcome::GatewayError { message, .. } => Some(message.clone()),
        }
    }
}

#[async_trait::async_trait]
pub trait ChannelSender: Send + Sync {
    fn channel(&self) -> Channel;

    async fn send(&self, message: &OutboundMessage) -> SendOutcome;
}

#[derive(Clone)]
pub struct OrgProfile {
    pub name: String,
    pub subtitle: String,
    pub contact_phone: String,
}

/// Best-effort administrative messages on the primary channel. Outcomes are
/// logged, never propagated.
#[derive(Clone)]
pub struct AdminNotifier {
    pub sender: Arc<dyn ChannelSender>,
    pub admin_phone: String,
}

impl AdminNotifier {
    pub async fn notify(&self, body: String) {
        let message = OutboundMessage {
            recipient: self.admin_phone.clone(),
            subject: None,
            body,
            media_url: None,
            priority: Priority::High,
        };

        let outcome = self.sender.send(&message).await;
        if !outcome.is_sent() {
            tracing::warn!("admin notification not sent: {:?}", outcome);
        }
    }
}
