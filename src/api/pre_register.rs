/// Early-access pre-registration endpoint
///
/// Landing-page signup: validates the email and appends a record to the
/// store. No account or session exists at this point.

use crate::api::AppState;
use crate::project::types::CreatePreRegistration;
use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde_json::{json, Value};

pub fn create_pre_register_routes() -> Router<AppState> {
    Router::new().route("/api/pre-register", post(pre_register))
}

/// Submit a pre-registration
///
/// POST /api/pre-register
/// Body: { "email": "...", "name": "...", "company": "...", "use_case": "..." }
async fn pre_register(
    State(state): State<AppState>,
    Json(payload): Json<CreatePreRegistration>,
) -> (StatusCode, Json<Value>) {
    if payload.email.is_empty() || !payload.email.contains('@') {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Valid email is required" })),
        );
    }

    match state.storage.create_pre_registration(payload).await {
        Ok(record) => {
            tracing::info!("📬 Pre-registration recorded: {}", record.id);
            (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": "Pre-registration submitted successfully!",
                    "data": record,
                })),
            )
        }
        Err(e) => {
            tracing::error!("Failed to record pre-registration: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to submit pre-registration" })),
            )
        }
    }
}
