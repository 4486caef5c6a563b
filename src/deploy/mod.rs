/// Deployment layer
///
/// Pushes finished flows to an external n8n instance over its REST API:
/// validate, probe liveness, submit, optionally activate. Every step logs
/// into the result so operators get a full transcript per attempt.

// HTTP client for the n8n public API
pub mod client;

// Structured result and log-trail types
pub mod result;

pub use client::DeployClient;
pub use result::{AuthMethod, DeployDetails, DeployErrorKind, DeployResult};
