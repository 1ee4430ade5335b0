//! Main entry point for the ProjectDesk backend.
//!
//! This file loads configuration, opens the database, builds the router and
//! runs the HTTP server until it receives Ctrl-C.

mod api;
mod app;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use auth::service::ManagerBootstrap;
use config::Config;
use database::Database;
use services::role_service::RoleService;
use std::sync::Arc;
use tracing::info;
use utils::jwt::JwtUtils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let jwt_utils = Arc::new(JwtUtils::from_config(&config)?);
    let db = Database::new(&config).await?;

    if let Some(email) = &config.bootstrap_manager_email {
        RoleService::new(db.pool()).bootstrap_manager(email).await?;
    }

    let app = app::build_router(
        db.pool().clone(),
        jwt_utils,
        config.protect_resource_routes,
        ManagerBootstrap::new(config.bootstrap_manager_email.clone()),
    );

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("Starting ProjectDesk server on port {}", config.server_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server");
}
