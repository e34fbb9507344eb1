//! Application state for Axum web framework.
//!
//! Contains the repositories and resources shared by all request handlers.

use std::sync::Arc;

use crate::config::{JwtConfig, ProductsConfig};
use crate::procedure::ProcedureExecutor;
use crate::repositories::Repositories;

/// Application state shared across handlers.
///
/// Cloning is cheap: the executor is behind an `Arc` and the repositories
/// only hold clones of it.
#[derive(Clone)]
pub struct AppState {
    /// Stored procedure repositories
    pub repositories: Repositories,
    /// Executor used directly by the health checks
    pub executor: Arc<dyn ProcedureExecutor>,
    /// JWT configuration for token validation
    pub jwt_config: JwtConfig,
}

impl AppState {
    /// Creates the state over a procedure executor.
    ///
    /// # Example
    /// ```ignore
    /// let pools = establish_pools(&settings.database).await?;
    /// let executor = Arc::new(PgProcedureExecutor::new(pools));
    /// let state = AppState::new(executor, settings.jwt.clone(), &settings.products);
    /// ```
    pub fn new(
        executor: Arc<dyn ProcedureExecutor>,
        jwt_config: JwtConfig,
        products: &ProductsConfig,
    ) -> Self {
        let repositories =
            Repositories::new(executor.clone(), products.zero_customer_type_is_unspecified);
        Self {
            repositories,
            executor,
            jwt_config,
        }
    }
}
