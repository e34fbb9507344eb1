//! Async database connection pool implementation.
//!
//! Uses bb8 connection pool manager with diesel_async for PostgreSQL connections.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// Async connection pool type alias.
///
/// bb8::Pool internally uses Arc, so Clone is cheap (just reference count increment).
pub type AsyncDbPool = Pool<AsyncPgConnection>;

/// The default pool plus any pools registered by name.
#[derive(Clone)]
pub struct DbPools {
    default: AsyncDbPool,
    named: Arc<HashMap<String, AsyncDbPool>>,
}

impl DbPools {
    pub fn new(default: AsyncDbPool, named: HashMap<String, AsyncDbPool>) -> Self {
        Self {
            default,
            named: Arc::new(named),
        }
    }

    /// `None` selects the default pool.
    pub fn get(&self, name: Option<&str>) -> AppResult<&AsyncDbPool> {
        match name {
            None => Ok(&self.default),
            Some(name) => self.named.get(name).ok_or_else(|| AppError::Configuration {
                key: format!("database.pools.{name}"),
                source: anyhow::anyhow!("no pool named '{name}' is configured"),
            }),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }
}

/// Creates an async database connection pool.
///
/// Connections are opened lazily, so this succeeds even when the database is
/// not reachable yet; acquisition then fails after `connection_timeout` seconds.
pub async fn establish_async_connection_pool(
    url: &str,
    max_connections: u32,
    min_connections: u32,
    connection_timeout: u64,
) -> Result<AsyncDbPool, AppError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(url);
    let pool = Pool::builder()
        .max_size(max_connections)
        .min_idle(Some(min_connections.min(max_connections)))
        .connection_timeout(Duration::from_secs(connection_timeout))
        .build_unchecked(manager);
    Ok(pool)
}

/// Builds the default pool and every pool under `database.pools`.
pub async fn establish_pools(config: &DatabaseConfig) -> Result<DbPools, AppError> {
    let default = establish_async_connection_pool(
        &config.url,
        config.max_connections,
        config.min_connections,
        config.connection_timeout,
    )
    .await?;

    let mut named = HashMap::new();
    for (name, pool_config) in &config.pools {
        let pool = establish_async_connection_pool(
            &pool_config.url,
            pool_config.max_connections,
            0,
            config.connection_timeout,
        )
        .await?;
        tracing::info!(pool = %name, max_connections = pool_config.max_connections, "Named pool configured");
        named.insert(name.clone(), pool);
    }

    Ok(DbPools::new(default, named))
}
