//! User profile repository.

use std::sync::Arc;

use super::caller_id;
use crate::error::AppResult;
use crate::models::{UpdateUser, User};
use crate::procedure::{MANAGE_SCHEMA, ProcedureCall, ProcedureExecutor};

const GET_PROCEDURE: &str = "usp_get_users";
const PUT_PROCEDURE: &str = "usp_put_user";

#[derive(Clone)]
pub struct UserRepository {
    executor: Arc<dyn ProcedureExecutor>,
}

impl UserRepository {
    pub fn new(executor: Arc<dyn ProcedureExecutor>) -> Self {
        Self { executor }
    }

    /// Lists every user visible to the caller, or the one with `id`.
    ///
    /// `None` when nothing matched.
    pub async fn get(&self, caller: &str, id: Option<i32>) -> AppResult<Option<Vec<User>>> {
        let call = ProcedureCall::new(MANAGE_SCHEMA, GET_PROCEDURE)
            .input("user_id", caller_id(caller)?)
            .input_opt("id", id);

        let result = self.executor.execute(call).await?;
        if result.recordset(0).is_empty() {
            return Ok(None);
        }

        result.decode(0).map(Some)
    }

    /// Writes the full mutable field set; returns whether a row changed.
    pub async fn update(&self, caller: &str, id: i32, user: UpdateUser) -> AppResult<bool> {
        let call = ProcedureCall::new(MANAGE_SCHEMA, PUT_PROCEDURE)
            .input("user_id", caller_id(caller)?)
            .input("id", id)
            .input("username", user.username)
            .input("usercode", user.usercode)
            .input("given_name", user.given_name)
            .input("family_name", user.family_name)
            .input("phone_number", user.phone_number)
            .input("phone_number_verified", user.phone_number_verified)
            .input("email_verified", user.email_verified)
            .input("marketing_notifications", user.marketing_notifications)
            .input("accepted_terms", user.accepted_terms)
            .input("accepted_terms_version", user.accepted_terms_version)
            .input("active", user.active);

        let result = self.executor.execute(call).await?;
        Ok(result.affected())
    }
}
