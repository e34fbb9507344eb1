//! User profile handlers.

use std::time::Instant;

use axum::{
    Extension, Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    routing::get,
};
use validator::Validate;

use crate::api::dto::{Envelope, SuccessResponse, UpdateUserRequest, UsersResponse};
use crate::api::middleware::{
    Caller, Permission, authorize, handle_json_rejection, handle_path_rejection,
    handle_validation_errors, params_fail,
};
use crate::state::AppState;

/// Creates user-related routes.
///
/// Routes:
/// - GET /users       - List users visible to the caller
/// - GET /users/{id}  - Get one user
/// - PUT /users/{id}  - Update a user's mutable fields
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user).put(update_user))
}

fn user_id(path: Result<Path<String>, PathRejection>) -> Result<i32, Envelope> {
    let Path(raw) = path.map_err(handle_path_rejection)?;
    raw.parse()
        .map_err(|_| params_fail(format!("id must be an integer, got '{raw}'")))
}

async fn fetch_users(state: &AppState, subject: &str, id: Option<i32>, start: Instant) -> Result<Envelope, Envelope> {
    match state.repositories.users.get(subject, id).await {
        Ok(users) => Ok(Envelope::success(UsersResponse { users }, start)),
        Err(e) => {
            tracing::error!(error = ?e, ?id, "failed to get users");
            Err(Envelope::internal("failed to get users"))
        }
    }
}

/// GET /users
async fn list_users(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
) -> Result<Envelope, Envelope> {
    let start = Instant::now();
    let subject = authorize(caller.as_deref(), Permission::ReadAll)?;
    fetch_users(&state, subject, None, start).await
}

/// GET /users/{id}
///
/// An unknown id is not an error: the response simply has no `users` key.
async fn get_user(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Envelope, Envelope> {
    let start = Instant::now();
    let subject = authorize(caller.as_deref(), Permission::ReadAll)?;
    let id = user_id(path)?;
    fetch_users(&state, subject, Some(id), start).await
}

/// PUT /users/{id}
async fn update_user(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Envelope, Envelope> {
    let start = Instant::now();
    let subject = authorize(caller.as_deref(), Permission::WriteAll)?;
    let id = user_id(path)?;
    let Json(request) = body.map_err(handle_json_rejection)?;
    request.validate().map_err(handle_validation_errors)?;

    match state
        .repositories
        .users
        .update(subject, id, request.into_update_user())
        .await
    {
        Ok(success) => Ok(Envelope::success(SuccessResponse { success }, start)),
        Err(e) => {
            tracing::error!(error = ?e, id, "failed to update user");
            Err(Envelope::internal("failed to update user"))
        }
    }
}
