//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use std::time::Duration;

use axum::{Router, http::StatusCode, middleware};
use tower_http::timeout::TimeoutLayer;

use crate::api::handlers;
use crate::api::middleware::{
    caller_middleware, global_error_handler, logging_middleware, request_id_middleware,
    route_not_found,
};
use crate::config::Settings;
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Request ID - generates/propagates request IDs
/// 2. Logging - logs requests with request IDs
/// 3. Global error handler - rewrites bare error responses into envelopes
/// 4. Timeout - answers 408 after `server.request_timeout` seconds
/// 5. Caller - attaches verified token claims
///
/// # Routes
/// - `/health`, `/health/ready`, `/health/live` (no prefix, no token)
/// - `{prefix}/products/spotlight[/{product_id}/{customer_type}]`
/// - `{prefix}/users[/{id}]`
///
/// where `{prefix}` is `/api[/{api_version}]/{service_name}`.
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    let api_routes = Router::new()
        .merge(handlers::products::product_routes())
        .merge(handlers::users::user_routes());

    let prefix = settings.application.route_prefix();
    tracing::debug!(prefix = %prefix, "Mounting API routes");

    Router::new()
        .merge(handlers::health::health_routes())
        .nest(&prefix, api_routes)
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), caller_middleware))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(settings.server.request_timeout),
        ))
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
