use crate::domain::event::{
    ErrorEnvelope, ErrorPayload, ServiceDetails, VerifyPaymentRequest, VerifyPaymentResponse,
};
use crate::domain::receipt::{date_bucket, Receipt};
use crate::domain::record::{NewRecord, RecordStatus};
use crate::notify::email::validate_email;
use crate::notify::templates;
use crate::notify::whatsapp::normalize_phone;
use crate::notify::worker::{NotifyQueue, NotifyTask};
use crate::notify::AdminNotifier;
use crate::repo::records_repo::RecordsRepo;
use crate::repo::sequence_repo::SequenceRepo;
use crate::service::verifier::SignatureVerifier;
use axum::http::StatusCode;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentFlow {
    pub pool: PgPool,
    pub verifier: Arc<dyn SignatureVerifier>,
    pub queue: NotifyQueue,
    pub admin: AdminNotifier,
}

impl PaymentFlow {
    /// The whole critical path of a verified payment: mint the receipt
    /// number and persist the record in one transaction, then hand the slow
    /// work (certificate, fan-out) to the worker queue and return. Nothing
    /// past the commit is awaited here.
    pub async fn confirm(
        &self,
        req: VerifyPaymentRequest,
    ) -> Result<VerifyPaymentResponse, (StatusCode, ErrorEnvelope)> {
        let payer_phone = validate_request(&req)?;

        if !self
            .verifier
            .verify(&req.order_ref, &req.payment_ref, &req.signature)
        {
            // Possible tampering; alert the admin, never drop silently.
            let admin = self.admin.clone();
            let alert = templates::signature_failure_alert(&req.order_ref);
            tokio::spawn(async move { admin.notify(alert).await });

            return Err((
                StatusCode::BAD_REQUEST,
                err(
                    "SIGNATURE_VERIFICATION_FAILED",
                    "payment signature did not verify",
                ),
            ));
        }

        let category = req.details.category();
        let bucket = date_bucket(chrono::Utc::now().date_naive());
        let status = match req.details {
            ServiceDetails::Donation { .. } => RecordStatus::Success,
            _ => RecordStatus::Pending,
        };
        let record_id = Uuid::new_v4();

        let mut tx = self.pool.begin().await.map_err(store_unavailable)?;
        let sequence = SequenceRepo::allocate_tx(&mut tx, category, &bucket)
            .await
            .map_err(|e| {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    err("STORE_UNAVAILABLE", &e.to_string()),
                )
            })?;

        let receipt = Receipt {
            category,
            date_bucket: bucket,
            sequence,
        };
        let record = NewRecord {
            record_id,
            receipt_number: receipt.code(),
            category,
            payer_name: req.payer.full_name.trim().to_string(),
            payer_phone,
            payer_email: req.payer.email.clone(),
            amount_minor: req.amount_minor,
            order_ref: req.order_ref.clone(),
            payment_ref: req.payment_ref.clone(),
            status,
            details: req.details.clone(),
        };
        RecordsRepo::insert_tx(&mut tx, &record)
            .await
            .map_err(|e| store_unavailable_any(&e))?;
        tx.commit().await.map_err(store_unavailable)?;

        // Recording succeeded; a full queue degrades to a receipt without
        // fan-out rather than failing the confirmation.
        if let Err(e) = self.queue.try_send(NotifyTask { record_id }) {
            tracing::warn!(
                receipt = %record.receipt_number,
                "notification queue full, skipping fan-out: {e}"
            );
        }

        Ok(VerifyPaymentResponse {
            success: true,
            record_id,
            receipt_number: record.receipt_number,
            status,
        })
    }
}

/// Rejects bad input before anything external is touched. Returns the
/// canonical phone number to persist.
fn validate_request(req: &VerifyPaymentRequest) -> Result<String, (StatusCode, ErrorEnvelope)> {
    if req.amount_minor <= 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            err("INVALID_AMOUNT", "amount_minor must be > 0"),
        ));
    }
    if req.payer.full_name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            err("INVALID_PAYER_NAME", "payer name is required"),
        ));
    }
    if req.order_ref.is_empty() || req.payment_ref.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            err("MISSING_PAYMENT_REFS", "order_ref and payment_ref are required"),
        ));
    }

    let phone = normalize_phone(&req.payer.phone)
        .map_err(|reason| (StatusCode::BAD_REQUEST, err("INVALID_PHONE", &reason)))?;

    if let Some(email) = &req.payer.email {
        validate_email(email)
            .map_err(|reason| (StatusCode::BAD_REQUEST, err("INVALID_EMAIL", &reason)))?;
    }

    Ok(phone)
}

fn err(code: &str, message: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        },
    }
}

fn store_unavailable(e: sqlx::Error) -> (StatusCode, ErrorEnvelope) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        err("STORE_UNAVAILABLE", &e.to_string()),
    )
}

fn store_unavailable_any(e: &anyhow::Error) -> (StatusCode, ErrorEnvelope) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        err("STORE_UNAVAILABLE", &e.to_string()),
    )
}
