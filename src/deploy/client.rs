/// n8n deployment client
///
/// Submits a canonical flow to an external n8n instance over its REST
/// API. Each step appends at least one log line, so a full run leaves an
/// auditable transcript the operator can expand when something goes
/// wrong. Deployment is a single attempt: nothing is retried and there is
/// no cancellation path once the creation request is issued.

use crate::config::N8nConfig;
use crate::deploy::result::{AuthMethod, DeployDetails, DeployErrorKind, DeployResult};
use crate::flow::{validator, Flow};
use serde_json::{json, Value};

/// Client bound to one configured n8n instance
#[derive(Debug, Clone)]
pub struct DeployClient {
    http: reqwest::Client,
    config: N8nConfig,
}

impl DeployClient {
    pub fn new(config: N8nConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Which authentication the client will use
    ///
    /// API-key header takes precedence over basic-auth credentials; with
    /// neither configured, requests go out unauthenticated.
    pub fn auth_method(&self) -> AuthMethod {
        if !self.config.api_key.is_empty() {
            AuthMethod::ApiKey
        } else if !self.config.user.is_empty() && !self.config.pass.is_empty() {
            AuthMethod::BasicAuth
        } else {
            AuthMethod::None
        }
    }

    /// Apply the selected auth method to an outgoing request
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_method() {
            AuthMethod::ApiKey => request.header("X-N8N-API-KEY", &self.config.api_key),
            AuthMethod::BasicAuth => {
                request.basic_auth(&self.config.user, Some(&self.config.pass))
            }
            AuthMethod::None => request,
        }
    }

    /// Probe engine liveness via the health endpoint
    ///
    /// Transport failures mean "not running" here, not a network error:
    /// an unreachable engine is an operational condition with its own
    /// actionable hint.
    pub async fn is_running(&self) -> bool {
        let url = format!("{}/healthz", self.config.base_url);
        match self.authorize(self.http.get(&url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Deploy a flow: validate, probe, submit, optionally activate
    ///
    /// Never returns an error; every failure mode is folded into the
    /// structured result with its log trail.
    pub async fn deploy(&self, flow: &Flow) -> DeployResult {
        let mut logs = Vec::new();
        logs.push("🚀 Starting n8n flow deployment...".to_string());

        // Step 1: structural validation, before any network traffic.
        logs.push("📋 Validating flow structure...".to_string());
        let validation = validator::validate_flow(flow);
        if !validation.is_valid {
            let joined = validation.errors.join(", ");
            logs.push(format!("❌ Validation failed: {joined}"));
            return DeployResult::failure(
                format!("Invalid flow structure: {joined}"),
                DeployErrorKind::InvalidFlow,
                logs,
            );
        }
        logs.push("✅ Flow validation passed".to_string());

        // Step 2: engine liveness.
        logs.push("🔍 Checking n8n status...".to_string());
        if !self.is_running().await {
            logs.push(format!("❌ n8n is not running at {}", self.config.base_url));
            logs.push("💡 Please start your n8n instance first".to_string());
            return DeployResult::failure(
                format!(
                    "n8n is not running at {}. Please start your n8n instance first.",
                    self.config.base_url
                ),
                DeployErrorKind::N8nNotRunning,
                logs,
            );
        }
        logs.push("✅ n8n is running".to_string());

        // Step 3: auth selection, log-only.
        logs.push("🔐 Checking authentication...".to_string());
        let auth_method = self.auth_method();
        logs.push(format!("📝 Using authentication: {auth_method}"));

        // Step 4: submit to the workflow-creation endpoint.
        logs.push("📦 Preparing workflow for deployment...".to_string());
        let workflow = json!({
            "name": flow.name,
            "nodes": flow.nodes,
            "connections": flow.connections,
            "settings": flow.settings.clone().unwrap_or_else(|| json!({})),
        });

        let url = format!("{}/api/v1/workflows", self.config.base_url);
        logs.push(format!("📤 Sending workflow to: {url}"));

        let response = match self
            .authorize(self.http.post(&url))
            .json(&workflow)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                logs.push(format!("❌ Network Error: {e}"));
                return DeployResult::failure(
                    format!("Network Error: {e}"),
                    DeployErrorKind::NetworkError,
                    logs,
                );
            }
        };

        let status = response.status();
        logs.push(format!("📊 Response status: {status}"));

        if !status.is_success() {
            // Surface full response diagnostics for auth/proxy debugging.
            logs.push("🔍 Response headers:".to_string());
            for (key, value) in response.headers() {
                logs.push(format!("   {}: {}", key, value.to_str().unwrap_or("<binary>")));
            }
            let body = response.text().await.unwrap_or_default();
            logs.push(format!("❌ API Error: {body}"));
            return DeployResult::failure(
                format!("API Error: {body}"),
                DeployErrorKind::ApiError,
                logs,
            );
        }

        let created: Value = match response.json().await {
            Ok(value) => value,
            Err(e) => {
                logs.push(format!("❌ Network Error: {e}"));
                return DeployResult::failure(
                    format!("Network Error: {e}"),
                    DeployErrorKind::NetworkError,
                    logs,
                );
            }
        };
        let Some(workflow_id) = workflow_id_of(&created) else {
            logs.push("❌ API Error: response did not include a workflow id".to_string());
            return DeployResult::failure(
                "API Error: response did not include a workflow id".to_string(),
                DeployErrorKind::ApiError,
                logs,
            );
        };
        logs.push(format!("✅ Workflow created with ID: {workflow_id}"));

        // Step 5: best-effort activation, failure never fails the deploy.
        if flow.active {
            logs.push("🔄 Activating workflow...".to_string());
            match self.activate(&workflow_id).await {
                Ok(()) => logs.push("✅ Workflow activated".to_string()),
                Err(e) => {
                    tracing::warn!("Could not activate workflow {}: {}", workflow_id, e);
                    logs.push(format!("⚠️ Could not activate workflow: {e}"));
                }
            }
        }

        logs.push("🎉 Deployment completed successfully!".to_string());
        DeployResult::success(
            format!("Flow \"{}\" deployed successfully!", flow.name),
            workflow_id,
            logs,
            DeployDetails {
                flow_name: flow.name.clone(),
                node_count: flow.nodes.len(),
                connection_count: flow.connections.len(),
                auth_method,
                n8n_status: true,
            },
        )
    }

    /// Activate a deployed workflow by id
    async fn activate(&self, workflow_id: &str) -> anyhow::Result<()> {
        let url = format!(
            "{}/api/v1/workflows/{}/activate",
            self.config.base_url, workflow_id
        );
        let response = self.authorize(self.http.post(&url)).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("activation returned {}", response.status());
        }
        Ok(())
    }
}

/// Engine-assigned id from the creation response, string or numeric
///
/// A 2xx response without an id is not a usable success: activation and
/// the UI's deep link both need it.
fn workflow_id_of(created: &Value) -> Option<String> {
    match created.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::catalog::starter_flow;

    fn config(api_key: &str, user: &str, pass: &str) -> N8nConfig {
        N8nConfig {
            // Unroutable on purpose: these tests must never reach a live engine.
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: api_key.to_string(),
            user: user.to_string(),
            pass: pass.to_string(),
        }
    }

    #[test]
    fn api_key_takes_precedence_over_basic_auth() {
        let client = DeployClient::new(config("key", "user", "pass"));
        assert_eq!(client.auth_method(), AuthMethod::ApiKey);
    }

    #[test]
    fn basic_auth_requires_both_credentials() {
        let client = DeployClient::new(config("", "user", "pass"));
        assert_eq!(client.auth_method(), AuthMethod::BasicAuth);

        let client = DeployClient::new(config("", "user", ""));
        assert_eq!(client.auth_method(), AuthMethod::None);
    }

    #[tokio::test]
    async fn invalid_flow_short_circuits_before_any_request() {
        let client = DeployClient::new(config("", "", ""));
        let mut flow = starter_flow("F");
        flow.nodes.clear();

        let result = client.deploy(&flow).await;
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(DeployErrorKind::InvalidFlow));
        assert!(result
            .logs
            .iter()
            .any(|l| l.contains("Validation failed")));
        // The liveness probe never ran.
        assert!(!result.logs.iter().any(|l| l.contains("Checking n8n status")));
    }

    #[test]
    fn creation_response_id_accepts_string_or_number_only() {
        use serde_json::json;
        assert_eq!(workflow_id_of(&json!({"id": "wf-12"})), Some("wf-12".to_string()));
        assert_eq!(workflow_id_of(&json!({"id": 12})), Some("12".to_string()));
        assert_eq!(workflow_id_of(&json!({"id": ""})), None);
        assert_eq!(workflow_id_of(&json!({})), None);
    }

    #[tokio::test]
    async fn unreachable_engine_reports_not_running() {
        let client = DeployClient::new(config("", "", ""));
        let result = client.deploy(&starter_flow("F")).await;
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(DeployErrorKind::N8nNotRunning));
        assert!(result.logs.iter().any(|l| l.contains("n8n is not running")));
    }
}
