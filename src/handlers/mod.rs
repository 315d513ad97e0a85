//! HTTP request handlers, grouped per resource.

pub mod auth;
pub mod categories;
pub mod companies;
pub mod products;
pub mod stores;
pub mod users;

use uuid::Uuid;

use crate::error::ApiError;

/// Path ids arrive as strings; anything that is not a UUID is a client error,
/// not a missing resource.
pub fn parse_uid(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidUuid)
}
