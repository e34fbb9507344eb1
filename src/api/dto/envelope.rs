//! Response envelope shared by every API route.

use std::time::Instant;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

/// JSON body of every API response.
///
/// - success: `{data, code, executionTimeMs}`
/// - fail (caller's fault): `{data, code}`
/// - error (server's fault): `{message, code}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnvelopeBody {
    Success {
        #[serde(skip_serializing_if = "Value::is_null")]
        data: Value,
        code: u16,
        #[serde(rename = "executionTimeMs")]
        execution_time_ms: f64,
    },
    Fail {
        data: Value,
        code: u16,
    },
    Error {
        message: String,
        code: u16,
    },
}

/// An HTTP status paired with its envelope body.
#[derive(Debug, Clone)]
pub struct Envelope {
    status: StatusCode,
    body: EnvelopeBody,
}

impl Envelope {
    /// 200 with `data`, timed from `started`.
    ///
    /// Data that cannot be serialized turns into a 500 error envelope.
    pub fn success<T: Serialize>(data: T, started: Instant) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                status: StatusCode::OK,
                body: EnvelopeBody::Success {
                    data,
                    code: StatusCode::OK.as_u16(),
                    execution_time_ms: started.elapsed().as_secs_f64() * 1000.0,
                },
            },
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response data");
                Self::error("failed to serialize response", StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub fn fail(data: Value, status: StatusCode) -> Self {
        Self {
            status,
            body: EnvelopeBody::Fail {
                data,
                code: status.as_u16(),
            },
        }
    }

    pub fn error(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status,
            body: EnvelopeBody::Error {
                message: message.into(),
                code: status.as_u16(),
            },
        }
    }

    /// 500 error envelope with an opaque message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::error(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &EnvelopeBody {
        &self.body
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
