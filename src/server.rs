//! Server module for managing HTTP server lifecycle
//!
//! This module handles server initialization, startup, and graceful shutdown.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{Environment, settings::Settings};
use crate::db::establish_pools;
use crate::procedure::PgProcedureExecutor;
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    /// Create a new server with the given settings
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start the server and run until shutdown signal
    ///
    /// This method:
    /// 1. Logs startup information and checks the JWT secret
    /// 2. Opens the default and named connection pools
    /// 3. Builds the procedure executor, state and router
    /// 4. Serves until Ctrl+C or SIGTERM
    ///
    /// # Errors
    /// - JWT configuration errors
    /// - Database connection pool initialization errors
    /// - Address binding errors
    /// - Server runtime errors
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = &self.settings;

        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            environment = %Environment::from_env().as_str(),
            "Application starting"
        );

        tracing::info!(
            host = %settings.server.host,
            port = %settings.server.port,
            request_timeout = %settings.server.request_timeout,
            route_prefix = %settings.application.route_prefix(),
            "Server configuration loaded"
        );

        // URLs carry credentials and are never logged
        tracing::info!(
            max_connections = %settings.database.max_connections,
            min_connections = %settings.database.min_connections,
            connection_timeout = %settings.database.connection_timeout,
            named_pools = ?settings.database.pools.keys().collect::<Vec<_>>(),
            procedure_pool = ?settings.database.procedure_pool,
            "Database configuration loaded"
        );

        tracing::info!(
            level = %settings.logger.level,
            console_enabled = %settings.logger.console.enabled,
            file_enabled = %settings.logger.file.enabled,
            "Logger configuration loaded"
        );

        tracing::info!(
            zero_customer_type_is_unspecified =
                %settings.products.zero_customer_type_is_unspecified,
            "Products configuration loaded"
        );

        settings.jwt.validate().map_err(|e| {
            tracing::error!(error = %e, "JWT configuration validation failed");
            anyhow::anyhow!("JWT configuration validation failed: {}", e)
        })?;
        tracing::info!("JWT configuration validated");

        tracing::info!("Initializing database connection pools...");
        let pools = establish_pools(&settings.database).await?;
        tracing::info!(
            pools = ?pools.names().collect::<Vec<_>>(),
            "Database connection pools initialized"
        );

        let executor = PgProcedureExecutor::from_config(pools, &settings.database)?;
        tracing::info!(
            pool = executor.pool_name().unwrap_or("default"),
            "Stored procedures bound to pool"
        );
        let executor = Arc::new(executor);
        let state = AppState::new(executor, settings.jwt.clone(), &settings.products);
        let router = create_router(state, settings);
        tracing::info!("Router configured");

        let address = settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
///
/// A signal handler that cannot be installed is logged and never fires, so
/// the other one still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
