//! Repository layer for data access operations.
//!
//! Each method maps to exactly one stored procedure in the `manage` schema.

mod product_repo;
mod user_repo;

pub use product_repo::ProductRepository;
pub use user_repo::UserRepository;

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::procedure::ProcedureExecutor;

/// Aggregates all repositories for convenient access.
///
/// Repositories share one executor; cloning only bumps its reference count.
#[derive(Clone)]
pub struct Repositories {
    pub products: ProductRepository,
    pub users: UserRepository,
}

impl Repositories {
    /// Creates all repositories over the given executor.
    pub fn new(executor: Arc<dyn ProcedureExecutor>, zero_customer_type_is_unspecified: bool) -> Self {
        Self {
            products: ProductRepository::new(executor.clone(), zero_customer_type_is_unspecified),
            users: UserRepository::new(executor),
        }
    }
}

/// Converts the caller's subject into the integer `user_id` parameter.
pub(crate) fn caller_id(subject: &str) -> AppResult<i32> {
    subject.trim().parse().map_err(|_| AppError::Internal {
        source: anyhow::anyhow!("token subject '{subject}' is not a numeric user id"),
    })
}
