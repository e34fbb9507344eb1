//! Serve command handler
//!
//! Handles `serve --dry-run`: the configuration is checked as the server
//! would check it at startup, then a summary is printed.

use crate::config::settings::Settings;
use crate::error::AppResult;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    /// Create a new serve command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validate configuration without starting the server
    ///
    /// # Errors
    /// Returns the first configuration problem, including a missing or
    /// short JWT secret.
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        self.config.jwt.validate()?;

        let database = &self.config.database;
        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ API routes mounted under: {}", self.config.application.route_prefix());
        println!(
            "✓ Default pool: {}..={} connections",
            database.min_connections, database.max_connections
        );
        println!(
            "✓ Stored procedures run on pool: {}",
            database.procedure_pool.as_deref().unwrap_or("default")
        );
        for name in database.pools.keys() {
            println!("✓ Named pool configured: {name}");
        }
        println!(
            "✓ Customer type 0 treated as unspecified: {}",
            self.config.products.zero_customer_type_is_unspecified
        );
        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
