/// Conversational editing endpoint
///
/// One chat turn: load the project's current flow, invoke the assistant
/// with the transcript, recover a document from the reply, commit it to
/// the session, and persist it. Extraction failures surface the raw
/// assistant text so the operator can inspect what came back.

use crate::api::AppState;
use crate::assistant::{self, ChatMessage};
use crate::flow;
use crate::project::types::UpdateProject;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Request body for one chat turn: the full conversation transcript
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

pub fn create_chat_routes() -> Router<AppState> {
    Router::new().route("/api/projects/{id}/chat", post(chat_turn))
}

/// Run one assistant turn against a project's flow
///
/// POST /api/projects/:id/chat
/// Body: { "messages": [{ "role": "user", "content": "..." }, ...] }
async fn chat_turn(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if payload.messages.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Chat transcript is empty",
            None,
        ));
    }

    let project = match state.storage.get_project(&id).await {
        Ok(Some(project)) => project,
        Ok(None) => {
            return Err(error_response(
                StatusCode::NOT_FOUND,
                "Project not found",
                None,
            ))
        }
        Err(e) => {
            tracing::error!("Failed to look up project {}: {}", id, e);
            return Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Project lookup failed",
                None,
            ));
        }
    };

    // Current document: live session state, else the stored blob, else a
    // starter flow for a brand-new project.
    let current = state
        .sessions
        .current(&id)
        .or_else(|| project.flow_json.as_ref().map(flow::intake))
        .unwrap_or_else(|| flow::catalog::starter_flow(&project.name));

    tracing::info!("💬 Chat turn for project {} ({} messages)", id, payload.messages.len());

    let reply = match assistant::respond(&state.chat, &current, &payload.messages).await {
        Ok(reply) => reply,
        Err(e) => {
            // A matched-but-unparseable payload carries the raw text for
            // manual inspection; anything else is an upstream call failure.
            if let Some(extract_err) = e.downcast_ref::<assistant::ExtractError>() {
                tracing::warn!("Chat extraction failed for project {}", id);
                return Err(error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not parse workflow JSON from response",
                    Some(extract_err.raw.clone()),
                ));
            }
            tracing::error!("Assistant call failed for project {}: {}", id, e);
            return Err(error_response(
                StatusCode::BAD_GATEWAY,
                &format!("Assistant call failed: {e}"),
                None,
            ));
        }
    };

    state.sessions.commit(&id, reply.flow.clone());

    // Persist the updated document; a failed save is logged but the chat
    // turn still returns the committed flow.
    let update = UpdateProject {
        flow_json: serde_json::to_value(&reply.flow).ok(),
        ..Default::default()
    };
    if let Err(e) = state.storage.update_project(&id, update).await {
        tracing::error!("Failed to persist flow for project {}: {}", id, e);
    }

    Ok(Json(json!({
        "flow": reply.flow,
        "message": reply.message,
        "raw": reply.raw,
    })))
}

fn error_response(
    status: StatusCode,
    message: &str,
    raw: Option<String>,
) -> (StatusCode, Json<Value>) {
    let mut body = json!({ "error": message });
    if let Some(raw) = raw {
        body["raw"] = Value::String(raw);
    }
    (status, Json(body))
}
