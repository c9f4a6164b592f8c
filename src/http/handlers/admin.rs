use crate::certificate::CertificateRequest;
use crate::domain::event::{ErrorEnvelope, ErrorPayload};
use crate::domain::record::{transition, RecordStatus};
use crate::notify::worker::NotifyTask;
use crate::repo::records_repo::RecordsRepo;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: RecordStatus,
    /// Distinct, explicitly logged admin action; bypasses the lifecycle
    /// guard instead of silently retrying a rejected transition.
    #[serde(rename = "override", default)]
    pub force: bool,
}

pub async fn transition_status(
    State(state): State<AppState>,
    Path(receipt_number): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> impl IntoResponse {
    match apply_transition(&state, &receipt_number, &req).await {
        Ok(from) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "receipt_number": receipt_number,
                "from": from,
                "to": req.status,
                "override": req.force,
            })),
        )
            .into_response(),
        Err((status, body)) => (status, Json(body)).into_response(),
    }
}

async fn apply_transition(
    state: &AppState,
    receipt_number: &str,
    req: &TransitionRequest,
) -> Result<RecordStatus, (StatusCode, ErrorEnvelope)> {
    let mut tx = state.pool.begin().await.map_err(|e| internal(&e.to_string()))?;

    let Some((record_id, current)) = RecordsRepo::lock_status_tx(&mut tx, receipt_number)
        .await
        .map_err(|e| internal(&e.to_string()))?
    else {
        return Err((
            StatusCode::NOT_FOUND,
            err("RECORD_NOT_FOUND", "no record with that receipt number"),
        ));
    };

    if req.force {
        tracing::warn!(
            receipt = receipt_number,
            from = current.as_str(),
            to = req.status.as_str(),
            "admin override transition"
        );
    } else {
        transition(current, req.status).map_err(|e| {
            (
                StatusCode::CONFLICT,
                err("INVALID_TRANSITION", &e.to_string()),
            )
        })?;
    }

    RecordsRepo::set_status_tx(&mut tx, record_id, req.status)
        .await
        .map_err(|e| internal(&e.to_string()))?;
    tx.commit().await.map_err(|e| internal(&e.to_string()))?;

    Ok(current)
}

/// Manual retry. Creates a fresh dispatch pass (and fresh jobs); failed jobs
/// are never resurrected in place.
pub async fn resend_notifications(
    State(state): State<AppState>,
    Path(receipt_number): Path<String>,
) -> impl IntoResponse {
    let record = match state.records_repo.find_by_receipt(&receipt_number).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(err("RECORD_NOT_FOUND", "no record with that receipt number")),
            )
                .into_response()
        }
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, Json(internal_body(&e.to_string()))).into_response(),
    };

    match state.queue.try_send(NotifyTask {
        record_id: record.record_id,
    }) {
        Ok(()) => (
            StatusCode::ACCEPTED,
            Json(serde_json::json!({"queued": true, "receipt_number": receipt_number})),
        )
            .into_response(),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(err("QUEUE_FULL", "notification queue is full, try again shortly")),
        )
            .into_response(),
    }
}

pub async fn regenerate_certificate(
    State(state): State<AppState>,
    Path(receipt_number): Path<String>,
) -> impl IntoResponse {
    let record = match state.records_repo.find_by_receipt(&receipt_number).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(err("RECORD_NOT_FOUND", "no record with that receipt number")),
            )
                .into_response()
        }
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, Json(internal_body(&e.to_string()))).into_response(),
    };

    state
        .certificates
        .request_async(CertificateRequest::for_record(&record));

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({"requested": true, "receipt_number": receipt_number})),
    )
        .into_response()
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

fn internal(message: &str) -> (StatusCode, ErrorEnvelope) {
    (StatusCode::INTERNAL_SERVER_ERROR, internal_body(message))
}

fn internal_body(message: &str) -> ErrorEnvelope {
    err("INTERNAL_ERROR", message)
}
