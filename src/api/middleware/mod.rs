//! Middleware components for request processing.
//!
//! This module contains middleware for logging, request ID tracking,
//! error handling, and caller authentication.

mod auth;
mod error_handler;
mod logging;
mod request_id;

pub use auth::{Caller, Permission, authorize, caller_middleware};
pub use error_handler::{
    global_error_handler, handle_json_rejection, handle_path_rejection, handle_validation_errors,
    params_fail, route_not_found,
};
pub use logging::logging_middleware;
pub use request_id::{RequestId, request_id_middleware};
