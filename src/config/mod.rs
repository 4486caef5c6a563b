/// Configuration management
///
/// Handles server binding, database location, n8n engine access, and
/// assistant credentials. Everything is overridable through environment
/// variables for container deployment.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// External n8n engine configuration
    pub n8n: N8nConfig,
    /// LLM assistant configuration
    pub assistant: AssistantConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g. "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding the SQLite database file (default: "data")
    pub data_dir: String,
}

/// Access configuration for the external n8n instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct N8nConfig {
    /// Engine base URL (default: "http://localhost:5678")
    pub base_url: String,
    /// API key; takes precedence over basic auth when set
    pub api_key: String,
    /// Basic-auth user, used only when no API key is configured
    pub user: String,
    /// Basic-auth password
    pub pass: String,
}

/// LLM assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Anthropic API key
    pub api_key: String,
    /// Wall-clock timeout for one completion call, in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("FLOWPILOT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("FLOWPILOT_PORT")
                    .unwrap_or_else(|_| "3100".to_string())
                    .parse()
                    .unwrap_or(3100),
            },
            database: DatabaseConfig {
                data_dir: std::env::var("FLOWPILOT_DATA_DIR")
                    .unwrap_or_else(|_| "data".to_string()),
            },
            n8n: N8nConfig {
                base_url: std::env::var("N8N_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:5678".to_string()),
                api_key: std::env::var("N8N_API_KEY").unwrap_or_default(),
                user: std::env::var("N8N_USER").unwrap_or_default(),
                pass: std::env::var("N8N_PASS").unwrap_or_default(),
            },
            assistant: AssistantConfig {
                api_key: std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
                timeout_secs: std::env::var("FLOWPILOT_CHAT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .unwrap_or(60),
            },
        }
    }
}
