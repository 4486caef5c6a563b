/// Deployment result types
///
/// Structured, serializable outcome of a deployment attempt. The log
/// trail rides along with the result so the full transcript can be
/// surfaced in the UI next to the one-line summary.

use serde::Serialize;
use std::fmt;

/// Final outcome of a single deployment attempt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResult {
    /// Whether the workflow now exists on the engine
    pub success: bool,
    /// One-line human-readable summary
    pub message: String,
    /// Engine-assigned workflow id, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<String>,
    /// Failure classification, on failure
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<DeployErrorKind>,
    /// Ordered step log, one attempt's full transcript
    pub logs: Vec<String>,
    /// Summary details, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<DeployDetails>,
}

/// Failure classification for a deployment attempt
///
/// None of these are retried automatically: `invalid_flow` needs a user
/// edit, the rest need operator attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployErrorKind {
    /// Structural validation failed; no request was issued
    InvalidFlow,
    /// The engine's health endpoint did not answer
    N8nNotRunning,
    /// The engine rejected the submitted document
    ApiError,
    /// Transport-level failure after the engine was confirmed live
    NetworkError,
}

/// Success summary attached to a completed deployment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployDetails {
    pub flow_name: String,
    pub node_count: usize,
    /// Number of source entries in the connection map
    pub connection_count: usize,
    pub auth_method: AuthMethod,
    pub n8n_status: bool,
}

/// Authentication method selected for engine requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthMethod {
    #[serde(rename = "API Key")]
    ApiKey,
    #[serde(rename = "Basic Auth")]
    BasicAuth,
    #[serde(rename = "None")]
    None,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AuthMethod::ApiKey => "API Key",
            AuthMethod::BasicAuth => "Basic Auth",
            AuthMethod::None => "None",
        };
        f.write_str(label)
    }
}

impl DeployResult {
    pub fn success(
        message: String,
        workflow_id: String,
        logs: Vec<String>,
        details: DeployDetails,
    ) -> Self {
        Self {
            success: true,
            message,
            workflow_id: Some(workflow_id),
            error_kind: None,
            logs,
            details: Some(details),
        }
    }

    pub fn failure(message: String, kind: DeployErrorKind, logs: Vec<String>) -> Self {
        Self {
            success: false,
            message,
            workflow_id: None,
            error_kind: Some(kind),
            logs,
            details: None,
        }
    }
}
