/// Deployment endpoint
///
/// Forwards a flow to the deployment client and, on success, persists the
/// deployed status. Deploy and save are independent fallible steps and
/// the response carries a tagged outcome, so "deployed but not saved" is
/// never conflated with either total success or total failure.

use crate::api::AppState;
use crate::flow::Flow;
use crate::project::types::{ProjectStatus, UpdateProject};
use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Request body for a deployment
#[derive(Debug, Deserialize)]
pub struct DeployRequest {
    /// The flow to submit, in canonical shape
    pub flow: Flow,
    /// Project to mark deployed afterwards, if any
    #[serde(default)]
    pub project_id: Option<String>,
}

/// Combined outcome of the deploy-then-save sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployOutcome {
    /// Workflow created and project record updated
    BothOk,
    /// Workflow created but the project update failed; partial success
    DeployOkSaveFailed,
    /// The engine never accepted the workflow
    DeployFailed,
}

pub fn create_deploy_routes() -> Router<AppState> {
    Router::new().route("/api/deploy", post(deploy_flow))
}

/// Deploy a flow to the configured n8n instance
///
/// POST /api/deploy
/// Body: { "flow": {...}, "project_id": "..." }
async fn deploy_flow(
    State(state): State<AppState>,
    Json(payload): Json<DeployRequest>,
) -> (StatusCode, Json<Value>) {
    let result = state.deployer.deploy(&payload.flow).await;

    if !result.success {
        tracing::warn!(
            "❌ Deployment failed ({:?}): {}",
            result.error_kind,
            result.message
        );
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "outcome": DeployOutcome::DeployFailed,
                "deploy": result,
            })),
        );
    }

    tracing::info!(
        "🎉 Deployed flow \"{}\" as workflow {:?}",
        payload.flow.name,
        result.workflow_id
    );

    // The workflow exists on the engine now; the project update is an
    // independent step whose failure leaves us in a partial-success state.
    let mut outcome = DeployOutcome::BothOk;
    let mut save_error = None;
    if let Some(project_id) = &payload.project_id {
        let update = UpdateProject {
            status: Some(ProjectStatus::Deployed),
            flow_json: serde_json::to_value(&payload.flow).ok(),
            ..Default::default()
        };
        match state.storage.update_project(project_id, update).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!("⚠️ Deployed, but project {} no longer exists", project_id);
                outcome = DeployOutcome::DeployOkSaveFailed;
                save_error = Some("Project not found".to_string());
            }
            Err(e) => {
                tracing::error!("⚠️ Deployed, but saving project {} failed: {}", project_id, e);
                outcome = DeployOutcome::DeployOkSaveFailed;
                save_error = Some(e.to_string());
            }
        }
    }

    let mut body = json!({ "outcome": outcome, "deploy": result });
    if let Some(save_error) = save_error {
        body["saveError"] = Value::String(save_error);
    }
    (StatusCode::OK, Json(body))
}
