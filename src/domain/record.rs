use crate::domain::event::ServiceDetails;
use crate::domain::receipt::ReceiptCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Pending,
    Confirmed,
    Success,
    Completed,
    Cancelled,
    Failed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "PENDING",
            RecordStatus::Confirmed => "CONFIRMED",
            RecordStatus::Success => "SUCCESS",
            RecordStatus::Completed => "COMPLETED",
            RecordStatus::Cancelled => "CANCELLED",
            RecordStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(RecordStatus::Pending),
            "CONFIRMED" => Some(RecordStatus::Confirmed),
            "SUCCESS" => Some(RecordStatus::Success),
            "COMPLETED" => Some(RecordStatus::Completed),
            "CANCELLED" => Some(RecordStatus::Cancelled),
            "FAILED" => Some(RecordStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RecordStatus::Completed | RecordStatus::Cancelled | RecordStatus::Failed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid record transition {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: RecordStatus,
    pub to: RecordStatus,
}

/// Legal lifecycle moves. Anything out of a terminal status is rejected;
/// admin override is a separate operation handled by the caller.
pub fn transition(from: RecordStatus, to: RecordStatus) -> Result<RecordStatus, InvalidTransition> {
    use RecordStatus::*;

    let allowed = matches!(
        (from, to),
        (Pending, Confirmed)
            | (Pending, Success)
            | (Pending, Cancelled)
            | (Pending, Failed)
            | (Confirmed, Completed)
            | (Confirmed, Cancelled)
            | (Confirmed, Failed)
            | (Success, Completed)
            | (Success, Cancelled)
            | (Success, Failed)
    );

    if allowed {
        Ok(to)
    } else {
        Err(InvalidTransition { from, to })
    }
}

pub fn display_amount(amount_minor: i64) -> String {
    if amount_minor % 100 == 0 {
        format!("{}", amount_minor / 100)
    } else {
        format!("{}.{:02}", amount_minor / 100, amount_minor % 100)
    }
}

#[derive(Debug, Clone)]
pub struct NewRecord {
    pub record_id: Uuid,
    pub receipt_number: String,
    pub category: ReceiptCategory,
    pub payer_name: String,
    pub payer_phone: String,
    pub payer_email: Option<String>,
    pub amount_minor: i64,
    pub order_ref: String,
    pub payment_ref: String,
    pub status: RecordStatus,
    pub details: ServiceDetails,
}

#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub record_id: Uuid,
    pub receipt_number: String,
    pub category: ReceiptCategory,
    pub payer_name: String,
    pub payer_phone: String,
    pub payer_email: Option<String>,
    pub amount_minor: i64,
    pub order_ref: String,
    pub payment_ref: String,
    pub status: RecordStatus,
    pub details: ServiceDetails,
    pub certificate_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewRecord {
    pub fn into_stored(self, created_at: DateTime<Utc>) -> StoredRecord {
        StoredRecord {
            record_id: self.record_id,
            receipt_number: self.receipt_number,
            category: self.category,
            payer_name: self.payer_name,
            payer_phone: self.payer_phone,
            payer_email: self.payer_email,
            amount_minor: self.amount_minor,
            order_ref: self.order_ref,
            payment_ref: self.payment_ref,
            status: self.status,
            details: self.details,
            certificate_url: None,
            created_at,
        }
    }
}
