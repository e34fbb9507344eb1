//! Conversion of rejected input and framework errors into envelopes.
//!
//! Handlers turn extractor rejections into 400 fail envelopes with the helpers
//! below. Responses produced outside the handlers (unknown routes, wrong
//! methods, timeouts) are rewritten by [`global_error_handler`].

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::ValidationErrors;

use crate::api::dto::Envelope;

/// 400 fail envelope for unusable path parameters: `{params: ...}`.
pub fn params_fail(message: impl Into<String>) -> Envelope {
    Envelope::fail(json!({"params": message.into()}), StatusCode::BAD_REQUEST)
}

/// 400 fail envelope for an unusable body: `{body: ...}`.
pub fn body_fail(details: serde_json::Value) -> Envelope {
    Envelope::fail(json!({"body": details}), StatusCode::BAD_REQUEST)
}

pub fn handle_path_rejection(rejection: PathRejection) -> Envelope {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => params_fail(err.body_text()),
        PathRejection::MissingPathParams(err) => params_fail(err.body_text()),
        other => params_fail(other.body_text()),
    }
}

pub fn handle_json_rejection(rejection: JsonRejection) -> Envelope {
    let message = match &rejection {
        JsonRejection::JsonDataError(err) => err.body_text(),
        JsonRejection::JsonSyntaxError(err) => err.body_text(),
        JsonRejection::MissingJsonContentType(_) => {
            "Missing or invalid Content-Type header, expected application/json".to_string()
        }
        JsonRejection::BytesRejection(_) => "Failed to read request body".to_string(),
        other => other.body_text(),
    };
    body_fail(json!(message))
}

pub fn handle_validation_errors(errors: ValidationErrors) -> Envelope {
    body_fail(serde_json::to_value(&errors).unwrap_or_else(|_| json!(errors.to_string())))
}

/// Fallback for unknown routes.
pub async fn route_not_found() -> Envelope {
    Envelope::error("route not found", StatusCode::NOT_FOUND)
}

/// Global error handling middleware that rewrites non-JSON error responses
/// (405 from the router, 408 from the timeout layer, ...) into the error
/// envelope.
pub async fn global_error_handler(
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if is_json {
        return response;
    }

    let (parts, _body) = response.into_parts();
    let message = match status {
        StatusCode::BAD_REQUEST => "bad request",
        StatusCode::NOT_FOUND => "route not found",
        StatusCode::METHOD_NOT_ALLOWED => "method not allowed",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "unsupported media type",
        StatusCode::REQUEST_TIMEOUT => "request timeout",
        StatusCode::PAYLOAD_TOO_LARGE => "request payload too large",
        StatusCode::SERVICE_UNAVAILABLE => "service unavailable",
        s if s.is_server_error() => "internal server error",
        _ => "request failed",
    };

    let mut rewritten = Envelope::error(message, status).into_response();
    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            rewritten.headers_mut().insert(name.clone(), value.clone());
        }
    }
    rewritten
}
