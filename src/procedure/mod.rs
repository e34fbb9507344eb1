//! Stored procedure call layer.
//!
//! Every read and write in this service is a single call to a function in the
//! `manage` schema. This module describes such calls as typed values, runs them
//! on a pooled connection and reshapes the returned rows into ordered result
//! sets plus affected-row reports.

mod call;
mod executor;
mod postgres;
mod result;
mod value;

pub use call::{ProcedureCall, ProcedureParam};
pub use executor::ProcedureExecutor;
pub use postgres::PgProcedureExecutor;
pub use result::{ProcedureResult, ProcedureRow};
pub use value::SqlValue;

/// Schema holding every procedure this service calls.
pub const MANAGE_SCHEMA: &str = "manage";
