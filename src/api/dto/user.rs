//! User-related DTOs for API requests and responses.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{UpdateUser, User};

/// Request body for `PUT /users/{id}`.
///
/// Read-only fields sent by clients (`customer_id`, `created`, ...) are ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be between 1 and 100 characters"))]
    pub username: String,
    pub usercode: i32,
    pub given_name: String,
    pub family_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub phone_number_verified: bool,
    pub email_verified: bool,
    pub marketing_notifications: bool,
    #[serde(default)]
    pub accepted_terms: Option<Timestamp>,
    pub accepted_terms_version: i32,
    pub active: bool,
}

impl UpdateUserRequest {
    /// Converts the request DTO into the procedure's mutable field set.
    pub fn into_update_user(self) -> UpdateUser {
        UpdateUser {
            username: self.username,
            usercode: self.usercode,
            given_name: self.given_name,
            family_name: self.family_name,
            phone_number: self.phone_number,
            phone_number_verified: self.phone_number_verified,
            email_verified: self.email_verified,
            marketing_notifications: self.marketing_notifications,
            accepted_terms: self.accepted_terms,
            accepted_terms_version: self.accepted_terms_version,
            active: self.active,
        }
    }
}

/// `{users}`; the key is left out when nothing matched.
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
}

/// `{success}` for user updates and spotlight deletes.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
