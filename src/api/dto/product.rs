//! Products spotlight DTOs.

use serde::Deserialize;
use validator::Validate;

use crate::models::{CustomerTypeSelector, NewProductSpotlight};

/// Request body for creating or updating a spotlight entry.
#[derive(Debug, Deserialize, Validate)]
pub struct ProductSpotlightRequest {
    #[validate(length(min = 1, max = 50, message = "product_itemnum must be between 1 and 50 characters"))]
    pub product_itemnum: String,
    #[serde(default)]
    pub customer_type: Option<i32>,
    pub unit_id: i32,
}

impl ProductSpotlightRequest {
    pub fn into_new_product_spotlight(self) -> NewProductSpotlight {
        NewProductSpotlight {
            product_itemnum: self.product_itemnum,
            customer_type: self.customer_type,
            unit_id: self.unit_id,
        }
    }
}

/// Raw `/{product_id}/{customer_type}` path segments.
#[derive(Debug, Deserialize)]
pub struct SpotlightPath {
    pub product_id: String,
    pub customer_type: String,
}

impl SpotlightPath {
    /// Coerces the segments; `customer_type` may be the literal `null`.
    pub fn parse(&self) -> Result<(i32, CustomerTypeSelector), String> {
        let product_id = self
            .product_id
            .parse()
            .map_err(|_| format!("product_id must be an integer, got '{}'", self.product_id))?;
        let customer_type = CustomerTypeSelector::parse(&self.customer_type).ok_or_else(|| {
            format!(
                "customer_type must be an integer or null, got '{}'",
                self.customer_type
            )
        })?;
        Ok((product_id, customer_type))
    }
}
