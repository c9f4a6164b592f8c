use crate::service::status_ingest::DeliveryCallback;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Form, Json};
use std::collections::HashMap;

/// Delivery-status callback. The gateway retries on non-2xx, so every
/// processed event is ACKed with 200 even when it reports a failed delivery;
/// the failure is handled internally.
pub async fn delivery_status(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    Form(callback): Form<DeliveryCallback>,
) -> impl IntoResponse {
    if let Some(expected) = &state.webhook_token {
        if params.get("token") != Some(expected) {
            return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
        }
    }

    if let Err(err) = state.ingest.ingest(callback).await {
        tracing::error!("delivery callback processing failed: {err:#}");
    }

    (StatusCode::OK, "ok").into_response()
}

/// Gateway webhook verification echoes the challenge back.
pub async fn verification_challenge(
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    match params.get("hub.challenge") {
        Some(challenge) => (StatusCode::OK, challenge.clone()).into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "invalid webhook verification request"})),
        )
            .into_response(),
    }
}
