//! Bearer token verification and per-route permission checks.

use std::collections::HashSet;
use std::fmt;

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::api::dto::Envelope;
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_token};

/// The verified identity behind a request.
///
/// Inserted into request extensions by [`caller_middleware`] and extracted in
/// handlers with `Option<Extension<Caller>>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Caller {
    subject: Option<String>,
    permissions: HashSet<String>,
}

impl Caller {
    pub fn new(subject: Option<String>, permissions: impl IntoIterator<Item = String>) -> Self {
        Self {
            subject,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// The subject claim, if present and non-empty.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(permission.as_str())
    }
}

impl From<Claims> for Caller {
    fn from(claims: Claims) -> Self {
        Self::new(claims.sub, claims.permissions)
    }
}

/// Permissions checked by the API routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ReadAll,
    Write,
    WriteAll,
    DeleteAll,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ReadAll => "read_all",
            Permission::Write => "write",
            Permission::WriteAll => "write_all",
            Permission::DeleteAll => "delete_all",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks the subject first, then the permission.
///
/// Returns the caller's subject, or the 401/403 fail envelope.
pub fn authorize(caller: Option<&Caller>, permission: Permission) -> Result<&str, Envelope> {
    let Some(caller) = caller else {
        return Err(missing_authorization());
    };
    let Some(subject) = caller.subject() else {
        return Err(missing_authorization());
    };

    if !caller.has_permission(permission) {
        tracing::debug!(subject, permission = %permission, "caller lacks permission");
        return Err(Envelope::fail(
            json!({"role": "missing permission"}),
            StatusCode::FORBIDDEN,
        ));
    }

    Ok(subject)
}

fn missing_authorization() -> Envelope {
    Envelope::fail(
        json!({"jwt": "missing authorization"}),
        StatusCode::UNAUTHORIZED,
    )
}

/// Attaches a [`Caller`] when the request carries a valid bearer token.
///
/// Missing or invalid tokens are not rejected here; handlers answer 401
/// when they find no caller.
///
/// # Example
/// ```ignore
/// Router::new()
///     .route("/protected", get(handler))
///     .layer(middleware::from_fn_with_state(state.clone(), caller_middleware))
/// ```
pub async fn caller_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if let Some(token) = token {
        match validate_token(token, &state.jwt_config.secret) {
            Ok(claims) => {
                request.extensions_mut().insert(Caller::from(claims));
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring invalid bearer token");
            }
        }
    }

    next.run(request).await
}
