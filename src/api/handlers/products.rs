//! Products spotlight handlers.

use std::time::Instant;

use axum::{
    Extension, Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    routing::{get, put},
};
use validator::Validate;

use crate::api::dto::{Envelope, ProductSpotlightRequest, SpotlightPath, SuccessResponse};
use crate::api::middleware::{
    Caller, Permission, authorize, handle_json_rejection, handle_path_rejection,
    handle_validation_errors, params_fail,
};
use crate::models::NewProductSpotlight;
use crate::state::AppState;

/// Creates the products routes.
///
/// Routes:
/// - GET    /products/spotlight
/// - POST   /products/spotlight
/// - PUT    /products/spotlight/{product_id}/{customer_type}
/// - DELETE /products/spotlight/{product_id}/{customer_type}
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products/spotlight", get(get_spotlight).post(create_spotlight))
        .route(
            "/products/spotlight/{product_id}/{customer_type}",
            put(update_spotlight).delete(delete_spotlight),
        )
}

fn payload(
    body: Result<Json<ProductSpotlightRequest>, JsonRejection>,
) -> Result<NewProductSpotlight, Envelope> {
    let Json(request) = body.map_err(handle_json_rejection)?;
    request.validate().map_err(handle_validation_errors)?;
    Ok(request.into_new_product_spotlight())
}

/// GET /products/spotlight
async fn get_spotlight(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
) -> Result<Envelope, Envelope> {
    let start = Instant::now();
    let subject = authorize(caller.as_deref(), Permission::ReadAll)?;

    match state.repositories.products.get(subject).await {
        Ok(overview) => Ok(Envelope::success(overview, start)),
        Err(e) => {
            tracing::error!(error = ?e, "failed to get products");
            Err(Envelope::internal("failed to get products"))
        }
    }
}

/// POST /products/spotlight
async fn create_spotlight(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    body: Result<Json<ProductSpotlightRequest>, JsonRejection>,
) -> Result<Envelope, Envelope> {
    let start = Instant::now();
    let subject = authorize(caller.as_deref(), Permission::Write)?;
    let payload = payload(body)?;

    match state.repositories.products.create(subject, payload).await {
        Ok(written) => Ok(Envelope::success(written, start)),
        Err(e) => {
            tracing::error!(error = ?e, "failed to post product");
            Err(Envelope::internal("failed to post product"))
        }
    }
}

/// PUT /products/spotlight/{product_id}/{customer_type}
async fn update_spotlight(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    path: Result<Path<SpotlightPath>, PathRejection>,
    body: Result<Json<ProductSpotlightRequest>, JsonRejection>,
) -> Result<Envelope, Envelope> {
    let start = Instant::now();
    let subject = authorize(caller.as_deref(), Permission::WriteAll)?;
    let Path(path) = path.map_err(handle_path_rejection)?;
    let (product_id, customer_type) = path.parse().map_err(params_fail)?;
    let payload = payload(body)?;

    match state
        .repositories
        .products
        .update(subject, product_id, customer_type, payload)
        .await
    {
        Ok(written) => Ok(Envelope::success(written, start)),
        Err(e) => {
            tracing::error!(error = ?e, product_id, ?customer_type, "failed to put product");
            Err(Envelope::internal("failed to put product"))
        }
    }
}

/// DELETE /products/spotlight/{product_id}/{customer_type}
async fn delete_spotlight(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    path: Result<Path<SpotlightPath>, PathRejection>,
) -> Result<Envelope, Envelope> {
    let start = Instant::now();
    let subject = authorize(caller.as_deref(), Permission::DeleteAll)?;
    let Path(path) = path.map_err(handle_path_rejection)?;
    let (product_id, customer_type) = path.parse().map_err(params_fail)?;

    match state
        .repositories
        .products
        .delete(subject, product_id, customer_type)
        .await
    {
        Ok(success) => Ok(Envelope::success(SuccessResponse { success }, start)),
        Err(e) => {
            tracing::error!(error = ?e, product_id, ?customer_type, "failed to delete product");
            Err(Envelope::internal("failed to delete product"))
        }
    }
}
