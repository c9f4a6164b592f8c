use crate::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    let status = if db_ok {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(serde_json::json!({"ready": db_ok, "db": db_ok}))).into_response()
}

/// DeliveryMetrics snapshot plus external-account reachability. Read-only.
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let (whatsapp_ok, certificates_ok) = tokio::join!(
        state.whatsapp.check_account(),
        state.certificates.health_check()
    );

    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({
            "delivery": state.metrics.snapshot(),
            "whatsapp_gateway": whatsapp_ok,
            "certificate_service": certificates_ok,
        })),
    )
        .into_response()
}
