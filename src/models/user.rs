use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A user profile row as returned by `usp_get_users`.
///
/// `customer_id`, `address_id`, `cart_available`, `last_authenticated_on`,
/// `created` and `modified` are maintained by the database and never written here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub usercode: i32,
    pub customer_id: Option<i32>,
    pub address_id: Option<i32>,
    pub cart_available: bool,
    pub given_name: String,
    pub family_name: String,
    pub phone_number: Option<String>,
    pub phone_number_verified: bool,
    pub email_verified: bool,
    pub last_authenticated_on: Option<Timestamp>,
    pub marketing_notifications: bool,
    pub accepted_terms: Option<Timestamp>,
    pub accepted_terms_version: i32,
    pub created: Timestamp,
    pub modified: Option<Timestamp>,
    pub active: bool,
}

/// The mutable field set written by `usp_put_user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUser {
    pub username: String,
    pub usercode: i32,
    pub given_name: String,
    pub family_name: String,
    pub phone_number: Option<String>,
    pub phone_number_verified: bool,
    pub email_verified: bool,
    pub marketing_notifications: bool,
    pub accepted_terms: Option<Timestamp>,
    pub accepted_terms_version: i32,
    pub active: bool,
}
