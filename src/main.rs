/// Flowpilot: conversational n8n workflow builder backend
///
/// Main entry point. Initializes configuration from the environment and
/// starts the HTTP server with project, chat, and deployment endpoints.

use flowpilot::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Project management API at /api/projects/*
/// - Conversational flow editing at /api/projects/{id}/chat
/// - One-click deployment at /api/deploy
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:3100 and a SQLite database)
    let config = Config::default();

    // Start the server
    start_server(config).await?;

    Ok(())
}
