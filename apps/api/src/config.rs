use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Missing required variables abort startup — in particular the AI gateway
/// credential, whose absence must never degrade into a silent no-op.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub auth_base_url: String,
    pub auth_service_key: String,
    pub ai_gateway_api_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            auth_base_url: require_env("AUTH_BASE_URL")?,
            auth_service_key: require_env("AUTH_SERVICE_KEY")?,
            ai_gateway_api_key: require_env("AI_GATEWAY_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
