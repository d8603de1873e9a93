pub mod config;
pub mod db;
pub mod mcp;
pub mod statistics;

pub use crate::config::{Config, Transport};
pub use crate::db::AppState;

use crate::mcp::tools::ToolRegistry;
use crate::mcp::McpService;

/// Loads configuration, connects to PostgreSQL and serves MCP on the
/// configured transport.
pub async fn run() -> anyhow::Result<()> {
    // stdout carries the protocol, so logs go to stderr only.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = Config::from_env()?;

    let app_state = match AppState::new(&config).await {
        Ok(state) => state,
        Err(e) => {
            log::error!(
                "Failed to connect to database. Please check DATABASE_URL in .env and ensure the database is running. Error: {}",
                e
            );
            return Err(e.into());
        }
    };

    let service = McpService::new(ToolRegistry::new(), app_state);

    match config.transport {
        Transport::Stdio => mcp::stdio::serve(&service).await?,
        Transport::Http => mcp::handlers::serve(service, &config.http_addr).await?,
    }

    Ok(())
}
