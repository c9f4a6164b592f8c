use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiptCategory {
    Donation,
    CeremonyBooking,
    Consultation,
    RemedialRite,
}

impl ReceiptCategory {
    pub fn prefix(&self) -> &'static str {
        match self {
            ReceiptCategory::Donation => "DN",
            ReceiptCategory::CeremonyBooking => "PB",
            ReceiptCategory::Consultation => "AC",
            ReceiptCategory::RemedialRite => "PARI",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptCategory::Donation => "DONATION",
            ReceiptCategory::CeremonyBooking => "CEREMONY_BOOKING",
            ReceiptCategory::Consultation => "CONSULTATION",
            ReceiptCategory::RemedialRite => "REMEDIAL_RITE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DONATION" => Some(ReceiptCategory::Donation),
            "CEREMONY_BOOKING" => Some(ReceiptCategory::CeremonyBooking),
            "CONSULTATION" => Some(ReceiptCategory::Consultation),
            "REMEDIAL_RITE" => Some(ReceiptCategory::RemedialRite),
            _ => None,
        }
    }
}

/// Daily bucket in DDMMYY form; sequences restart when the bucket rolls over.
pub fn date_bucket(date: NaiveDate) -> String {
    date.format("%d%m%y").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub category: ReceiptCategory,
    pub date_bucket: String,
    pub sequence: i64,
}

impl Receipt {
    pub fn code(&self) -> String {
        format!("{}-{}-{:04}", self.category.prefix(), self.date_bucket, self.sequence)
    }
}
