use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Claims carried by the bearer tokens this service accepts.
///
/// Tokens are issued elsewhere; this service only verifies them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (numeric user id as a string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Granted permission strings, e.g. `read_all`
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims valid for `ttl` from now
    pub fn new(subject: Option<String>, permissions: Vec<String>, ttl: SignedDuration) -> Self {
        let now = Timestamp::now();
        let exp = now.as_second().saturating_add(ttl.as_secs());

        Self {
            sub: subject,
            permissions,
            iat: now.as_second(),
            exp,
        }
    }
}

/// Signs claims with HS256.
///
/// Used by tests and local tooling.
pub fn generate_token(claims: &Claims, secret: &str) -> AppResult<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Validates and decodes an HS256 token
///
/// # Example
/// ```ignore
/// let claims = validate_token(&token, "secret")?;
/// println!("Subject: {:?}", claims.sub);
/// ```
pub fn validate_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        _ => AppError::Unauthorized {
            message: format!("Token validation failed: {}", e),
        },
    })
}
