/// HTTP API layer
///
/// REST endpoints for project CRUD, conversational flow editing, flow
/// import, and one-click deployment. Handlers stay thin: validate input,
/// call into the flow/assistant/deploy layers, translate the result.

// Project CRUD and flow import endpoints
pub mod projects;

// Conversational editing endpoint
pub mod chat;

// Deployment endpoint
pub mod deploy;

// Landing-page pre-registration endpoint
pub mod pre_register;

use crate::{
    assistant::ChatClient, deploy::DeployClient, flow::session::SessionRegistry,
    project::ProjectStorage,
};
use std::sync::Arc;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Project persistence
    pub storage: ProjectStorage,
    /// In-memory per-project flow sessions
    pub sessions: Arc<SessionRegistry>,
    /// LLM assistant client
    pub chat: ChatClient,
    /// n8n deployment client
    pub deployer: DeployClient,
}

pub use chat::create_chat_routes;
pub use deploy::create_deploy_routes;
pub use pre_register::create_pre_register_routes;
pub use projects::create_project_routes;
