use crate::domain::receipt::ReceiptCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayerContact {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirthDetails {
    pub date_of_birth: String,
    pub time_of_birth: String,
    pub place_of_birth: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceDetails {
    Donation {
        donation_type: String,
        donation_purpose: String,
    },
    CeremonyBooking {
        ceremony_name: String,
        preferred_date: Option<NaiveDate>,
        preferred_time: Option<String>,
        nakshatra: Option<String>,
        gotra: Option<String>,
    },
    Consultation {
        consultation_type: String,
        preferred_date: Option<NaiveDate>,
        preferred_time: Option<String>,
        birth_details: Option<BirthDetails>,
        #[serde(default)]
        concerns: Vec<String>,
    },
    RemedialRite {
        rite_name: String,
    },
}

impl ServiceDetails {
    pub fn category(&self) -> ReceiptCategory {
        match self {
            ServiceDetails::Donation { .. } => ReceiptCategory::Donation,
            ServiceDetails::CeremonyBooking { .. } => ReceiptCategory::CeremonyBooking,
            ServiceDetails::Consultation { .. } => ReceiptCategory::Consultation,
            ServiceDetails::RemedialRite { .. } => ReceiptCategory::RemedialRite,
        }
    }

    pub fn service_name(&self) -> &str {
        match self {
            ServiceDetails::Donation { donation_type, .. } => donation_type,
            ServiceDetails::CeremonyBooking { ceremony_name, .. } => ceremony_name,
            ServiceDetails::Consultation { consultation_type, .. } => consultation_type,
            ServiceDetails::RemedialRite { rite_name } => rite_name,
        }
    }

    pub fn notifies_admin(&self) -> bool {
        match self {
            ServiceDetails::Donation { .. } => true,
            ServiceDetails::CeremonyBooking { .. } => true,
            ServiceDetails::Consultation { .. } => true,
            ServiceDetails::RemedialRite { .. } => true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentRequest {
    pub order_ref: String,
    pub payment_ref: String,
    pub signature: String,
    pub amount_minor: i64,
    pub payer: PayerContact,
    pub details: ServiceDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub record_id: Uuid,
    pub receipt_number: String,
    pub status: crate::domain::record::RecordStatus,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}
