/// Server setup and initialization
///
/// Wires together storage, the session registry, the assistant client,
/// and the deployment client, then exposes everything through one Axum
/// router.

use crate::{
    api::{
        create_chat_routes, create_deploy_routes, create_pre_register_routes,
        create_project_routes, AppState,
    },
    assistant::ChatClient,
    config::Config,
    deploy::DeployClient,
    flow::session::SessionRegistry,
    project::ProjectStorage,
};
use anyhow::Result;
use axum::{routing::get, Router};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;

/// Create the main Axum application with all routes
pub async fn create_app(config: Config) -> Result<Router> {
    tracing::info!("📁 Ensuring data directory exists: {}", config.database.data_dir);
    std::fs::create_dir_all(&config.database.data_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create data directory: {}", e))?;

    // Project database with lazy file creation.
    tracing::info!("📋 Initializing project storage");
    let db_path = format!("{}/flowpilot.db", config.database.data_dir);
    let options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open project database: {}", e))?;

    let storage = ProjectStorage::new(pool);
    storage.init_schema().await?;

    tracing::info!("📊 Initializing session registry");
    let sessions = Arc::new(SessionRegistry::new());

    tracing::info!("🤖 Initializing assistant client");
    let chat = ChatClient::new(
        config.assistant.api_key.clone(),
        Duration::from_secs(config.assistant.timeout_secs),
    );

    tracing::info!("🔗 Initializing n8n deployment client for {}", config.n8n.base_url);
    let deployer = DeployClient::new(config.n8n.clone());

    let state = AppState {
        storage,
        sessions,
        chat,
        deployer,
    };

    tracing::info!("📡 Creating HTTP router with all endpoints");
    let app = Router::new()
        .route("/healthz", get(health_check))
        .merge(create_project_routes().with_state(state.clone()))
        .merge(create_chat_routes().with_state(state.clone()))
        .merge(create_pre_register_routes().with_state(state.clone()))
        .merge(create_deploy_routes().with_state(state));

    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Flowpilot server...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
