/// Project type definitions
///
/// A project is the unit of persistence: one flow document under
/// construction, plus the prompt and lifecycle status around it. Projects
/// are keyed by an opaque id and stored as rows with a JSON flow column.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored automation project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Opaque project identifier (UUID)
    pub id: String,
    /// Human-readable project name
    pub name: String,
    /// Optional free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Current flow document as an opaque JSON blob
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_json: Option<Value>,
    /// The original prompt that seeded the project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Lifecycle status
    pub status: ProjectStatus,
    /// Webhook URL assigned by the engine after deployment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployed_webhook_url: Option<String>,
    /// RFC3339 creation timestamp
    pub created_at: String,
    /// RFC3339 last-update timestamp
    pub updated_at: String,
}

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    Deployed,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Deployed => "deployed",
            ProjectStatus::Archived => "archived",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "deployed" => ProjectStatus::Deployed,
            "archived" => ProjectStatus::Archived,
            _ => ProjectStatus::Draft,
        }
    }
}

/// Fields accepted when creating a project
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// An early-access pre-registration record
///
/// Collected from the landing page before accounts exist; keyed like
/// projects but append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreRegistration {
    /// Opaque record identifier (UUID)
    pub id: String,
    /// Contact email, the only required field
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,
    /// RFC3339 creation timestamp
    pub created_at: String,
}

/// Fields accepted when submitting a pre-registration
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePreRegistration {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub use_case: Option<String>,
}

/// Partial update applied to an existing project
///
/// Absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub flow_json: Option<Value>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub deployed_webhook_url: Option<String>,
}
