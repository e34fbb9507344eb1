use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::sql_types::{Bool, Integer, Nullable, Text, Timestamptz};
use diesel_async::RunQueryDsl;

use super::{ProcedureCall, ProcedureExecutor, ProcedureResult, ProcedureRow, SqlValue};
use crate::config::DatabaseConfig;
use crate::db::DbPools;
use crate::error::{AppError, AppResult};

/// Executes procedure calls on the Postgres pools.
#[derive(Clone)]
pub struct PgProcedureExecutor {
    pools: DbPools,
    pool_name: Option<String>,
}

impl PgProcedureExecutor {
    /// Executor bound to the default pool.
    pub fn new(pools: DbPools) -> Self {
        Self {
            pools,
            pool_name: None,
        }
    }

    /// Executor on the pool named by `database.procedure_pool`, or on the
    /// default pool when that is unset.
    pub fn from_config(pools: DbPools, config: &DatabaseConfig) -> AppResult<Self> {
        match &config.procedure_pool {
            Some(name) => Self::with_pool(pools, name.clone()),
            None => Ok(Self::new(pools)),
        }
    }

    pub fn pool_name(&self) -> Option<&str> {
        self.pool_name.as_deref()
    }

    /// Executor bound to the pool registered under `name`.
    pub fn with_pool(pools: DbPools, name: impl Into<String>) -> AppResult<Self> {
        let name = name.into();
        pools.get(Some(&name))?;
        Ok(Self {
            pools,
            pool_name: Some(name),
        })
    }
}

#[async_trait]
impl ProcedureExecutor for PgProcedureExecutor {
    async fn execute(&self, call: ProcedureCall) -> AppResult<ProcedureResult> {
        let procedure = call.qualified_name();
        tracing::debug!(
            sql_schema = call.schema(),
            sql_proc = call.name(),
            params = ?call.params(),
            "running procedure"
        );

        let pool = self.pools.get(self.pool_name.as_deref())?;
        let mut conn = pool.get().await?;

        let mut query = diesel::sql_query(call.to_sql()).into_boxed::<Pg>();
        for param in call.params() {
            query = match &param.value {
                SqlValue::Int(v) => query.bind::<Nullable<Integer>, _>(*v),
                SqlValue::VarChar(v) => query.bind::<Nullable<Text>, _>(v.clone()),
                SqlValue::Bit(v) => query.bind::<Nullable<Bool>, _>(*v),
                SqlValue::DateTime(v) => {
                    query.bind::<Nullable<Timestamptz>, _>(v.map(jiff_diesel::Timestamp::from))
                }
            };
        }

        let rows: Vec<ProcedureRow> = query
            .load(&mut conn)
            .await
            .map_err(|e| AppError::procedure(procedure.clone(), e))?;

        let result = ProcedureResult::from_rows(procedure, rows)?;
        tracing::debug!(
            sql_proc = call.name(),
            recordsets = ?result.recordsets.iter().map(Vec::len).collect::<Vec<_>>(),
            rows_affected = ?result.rows_affected,
            "procedure result"
        );

        Ok(result)
    }

    async fn ping(&self) -> AppResult<()> {
        let pool = self.pools.get(self.pool_name.as_deref())?;
        let mut conn = pool.get().await?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(|e| AppError::procedure("ping", e))?;
        Ok(())
    }
}
