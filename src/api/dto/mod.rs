//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `envelope` - The success/fail/error response envelope
//! - `product` - Products spotlight request DTOs
//! - `user` - User request/response DTOs

mod envelope;
mod product;
mod user;

pub use envelope::{Envelope, EnvelopeBody};
pub use product::{ProductSpotlightRequest, SpotlightPath};
pub use user::{SuccessResponse, UpdateUserRequest, UsersResponse};
