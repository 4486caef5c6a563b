/// Flowpilot: conversational n8n workflow builder backend
///
/// This library takes arbitrary, possibly malformed workflow descriptions
/// (file imports, pasted JSON, LLM replies), normalizes them into a
/// canonical document, validates and wires them, and deploys finished
/// flows to an external n8n instance.

// Core configuration and setup
pub mod config;

// Flow document model and the normalize/validate/repair pipeline
pub mod flow;

// Conversational assistant: LLM client and response extraction
pub mod assistant;

// Deployment client for the n8n REST API
pub mod deploy;

// Project persistence layer
pub mod project;

// HTTP API layer - REST endpoints for projects, chat, and deployment
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use deploy::{DeployClient, DeployResult};
pub use flow::{ConnectionTarget, Flow, FlowNode};
pub use project::{Project, ProjectStorage};
pub use server::start_server;
