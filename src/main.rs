//! HTTP server for the HRM payroll engine.
//!
//! Reads configuration from `HRM_CONFIG_DIR` (default `./config/default`)
//! and listens on `HRM_BIND_ADDR` (default `0.0.0.0:3000`).

use std::env;

use hrm_payroll::api::{AppState, create_router};
use hrm_payroll::config::ConfigLoader;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir = env::var("HRM_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind_addr = env::var("HRM_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let config = ConfigLoader::load(&config_dir).inspect_err(|e| {
        error!(config_dir = %config_dir, error = %e, "Failed to load configuration");
    })?;
    info!(
        config_dir = %config_dir,
        employers = config.config().employers().len(),
        employees = config.config().reference().employees.len(),
        "Configuration loaded"
    );

    let router = create_router(AppState::new(config));
    let listener = TcpListener::bind(&bind_addr).await?;
    info!(bind_addr = %bind_addr, "HRM payroll engine listening");

    axum::serve(listener, router).await?;
    Ok(())
}
