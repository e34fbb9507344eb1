//! Products spotlight repository.

use std::sync::Arc;

use super::caller_id;
use crate::error::AppResult;
use crate::models::{
    CustomerTypeSelector, NewProductSpotlight, ProductWriteResult, SpotlightOverview,
};
use crate::procedure::{MANAGE_SCHEMA, ProcedureCall, ProcedureExecutor, ProcedureResult};

const GET_PROCEDURE: &str = "usp_get_products_spotlight";
const POST_PROCEDURE: &str = "usp_post_products_spotlight";
const PUT_PROCEDURE: &str = "usp_put_products_spotlight";
const DELETE_PROCEDURE: &str = "usp_delete_products_spotlight";

#[derive(Clone)]
pub struct ProductRepository {
    executor: Arc<dyn ProcedureExecutor>,
    zero_customer_type_is_unspecified: bool,
}

impl ProductRepository {
    pub fn new(executor: Arc<dyn ProcedureExecutor>, zero_customer_type_is_unspecified: bool) -> Self {
        Self {
            executor,
            zero_customer_type_is_unspecified,
        }
    }

    /// Returns the spotlight list with its reference data.
    ///
    /// `None` when the procedure's first result set is empty. Rows are not
    /// reshaped, so columns added to the procedure reach the caller as is.
    pub async fn get(&self, caller: &str) -> AppResult<Option<SpotlightOverview>> {
        let call = ProcedureCall::new(MANAGE_SCHEMA, GET_PROCEDURE).input("user_id", caller_id(caller)?);
        let result = self.executor.execute(call).await?;

        if result.recordset(0).is_empty() {
            return Ok(None);
        }

        Ok(Some(SpotlightOverview {
            products: result.recordset(0).to_vec(),
            customer_types: result.recordset(1).to_vec(),
            units: result.recordset(2).to_vec(),
        }))
    }

    pub async fn create(
        &self,
        caller: &str,
        payload: NewProductSpotlight,
    ) -> AppResult<ProductWriteResult> {
        let call = ProcedureCall::new(MANAGE_SCHEMA, POST_PROCEDURE).input("user_id", caller_id(caller)?);
        let call = Self::bind_payload(call, payload);

        let result = self.executor.execute(call).await?;
        Ok(Self::write_result(&result))
    }

    /// Updates the rows addressed by `(product_id, customer_type)`.
    pub async fn update(
        &self,
        caller: &str,
        product_id: i32,
        customer_type: CustomerTypeSelector,
        payload: NewProductSpotlight,
    ) -> AppResult<ProductWriteResult> {
        let call = ProcedureCall::new(MANAGE_SCHEMA, PUT_PROCEDURE)
            .input("user_id", caller_id(caller)?)
            .input("product_id", product_id)
            .input_opt("customer_type", self.customer_type_bind(customer_type));
        let call = Self::bind_payload(call, payload);

        let result = self.executor.execute(call).await?;
        Ok(Self::write_result(&result))
    }

    /// Returns whether any row was removed.
    pub async fn delete(
        &self,
        caller: &str,
        product_id: i32,
        customer_type: CustomerTypeSelector,
    ) -> AppResult<bool> {
        let call = ProcedureCall::new(MANAGE_SCHEMA, DELETE_PROCEDURE)
            .input("user_id", caller_id(caller)?)
            .input("product_id", product_id)
            .input_opt("customer_type", self.customer_type_bind(customer_type));

        let result = self.executor.execute(call).await?;
        Ok(result.affected())
    }

    fn customer_type_bind(&self, selector: CustomerTypeSelector) -> Option<i32> {
        selector.bind_value(self.zero_customer_type_is_unspecified)
    }

    fn bind_payload(call: ProcedureCall, payload: NewProductSpotlight) -> ProcedureCall {
        call.input("payload_product_itemnum", payload.product_itemnum)
            .input("payload_customer_type", payload.customer_type)
            .input("payload_unit_id", payload.unit_id)
    }

    fn write_result(result: &ProcedureResult) -> ProductWriteResult {
        if result.rows_affected.is_empty() {
            return ProductWriteResult::Unreported;
        }

        ProductWriteResult::Written {
            success: result.affected(),
            product: result.first(0).cloned(),
        }
    }
}
