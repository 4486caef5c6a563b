/// Project management REST API endpoints
///
/// Thin CRUD handlers over the project store. Flow documents coming in
/// through import are pushed through the normalize/repair intake pipeline
/// before they are committed to the editing session and persisted.

use crate::api::AppState;
use crate::flow;
use crate::project::types::{CreateProject, UpdateProject};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};

/// Create project management routes
pub fn create_project_routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", post(create_project))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/{id}", get(get_project))
        .route("/api/projects/{id}", put(update_project))
        .route("/api/projects/{id}", delete(delete_project))
        .route("/api/projects/{id}/import", post(import_flow))
}

/// Create a new project
///
/// POST /api/projects
/// Body: { "name": "...", "description": "...", "prompt": "..." }
async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProject>,
) -> Result<Json<Value>, StatusCode> {
    if payload.name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.storage.create_project(payload).await {
        Ok(project) => {
            // Seed the session with a starter flow so chat has a document
            // to edit from the first turn.
            state
                .sessions
                .commit(&project.id, flow::catalog::starter_flow(&project.name));
            tracing::info!("📁 Created project: {} ({})", project.id, project.name);
            Ok(Json(json!({ "project": project })))
        }
        Err(e) => {
            tracing::error!("Failed to create project: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// List all projects, most recently updated first
///
/// GET /api/projects
async fn list_projects(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    match state.storage.list_projects().await {
        Ok(projects) => Ok(Json(json!({ "projects": projects }))),
        Err(e) => {
            tracing::error!("Failed to list projects: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific project by id
///
/// GET /api/projects/:id
async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.storage.get_project(&id).await {
        Ok(Some(project)) => Ok(Json(json!({ "project": project }))),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to get project {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Apply a partial update to a project
///
/// PUT /api/projects/:id
async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProject>,
) -> Result<Json<Value>, StatusCode> {
    match state.storage.update_project(&id, payload).await {
        Ok(Some(project)) => {
            tracing::info!("📁 Updated project: {}", id);
            Ok(Json(json!({ "project": project })))
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to update project {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a project and drop its session state
///
/// DELETE /api/projects/:id
async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.storage.delete_project(&id).await {
        Ok(true) => {
            state.sessions.evict(&id);
            tracing::info!("🗑️ Deleted project: {}", id);
            Ok(Json(json!({ "message": "Project deleted successfully" })))
        }
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete project {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Import a flow document (file upload or pasted JSON)
///
/// POST /api/projects/:id/import
/// Body: raw flow JSON in the n8n interchange format
async fn import_flow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(raw): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    match state.storage.get_project(&id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to look up project {}: {}", id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    // Normalize and wire up whatever arrived, then commit and persist.
    let imported = flow::intake(&raw);
    let node_count = imported.nodes.len();
    state.sessions.commit(&id, imported.clone());

    let update = UpdateProject {
        flow_json: Some(serde_json::to_value(&imported).map_err(|e| {
            tracing::error!("Imported flow is not serializable: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?),
        ..Default::default()
    };
    if let Err(e) = state.storage.update_project(&id, update).await {
        tracing::error!("Failed to persist imported flow for {}: {}", id, e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    tracing::info!(
        "📥 Imported flow \"{}\" ({} nodes) into project {}",
        imported.name,
        node_count,
        id
    );

    Ok(Json(json!({
        "flow": imported,
        "message": format!(
            "Successfully loaded flow: {} ({} nodes)",
            imported.name, node_count
        ),
    })))
}
