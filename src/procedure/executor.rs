use async_trait::async_trait;

use super::{ProcedureCall, ProcedureResult};
use crate::error::AppResult;

/// Runs stored procedure calls.
///
/// The production implementation talks to Postgres; tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait ProcedureExecutor: Send + Sync {
    /// Executes `call` and returns its result sets and affected-row reports.
    async fn execute(&self, call: ProcedureCall) -> AppResult<ProcedureResult>;

    /// Checks that the backing store is reachable.
    async fn ping(&self) -> AppResult<()>;
}
