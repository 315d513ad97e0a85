use thiserror::Error;

/// Backing-store failure underneath the revocation list or user lookup.
/// Always fatal for the request: a failed lookup is never "not revoked".
#[derive(Debug, Error, PartialEq)]
#[error("storage failure: {0}")]
pub struct StorageError(pub String);

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError(err.to_string())
    }
}

/// Rejection kinds produced by the auth core.
///
/// Rejections are ordinary return values, not panics; the HTTP layer decides
/// status codes (see `crate::error::ApiError`).
#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("no bearer credential present")]
    MissingCredential,

    #[error("token is invalid or has expired")]
    InvalidToken,

    #[error("token has been revoked")]
    RevokedToken,

    #[error("an access token is required")]
    AccessTokenRequired,

    #[error("a refresh token is required")]
    RefreshTokenRequired,

    #[error("insufficient permissions for this action")]
    InsufficientPermission,

    #[error("account is not verified")]
    AccountNotVerified,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("user not found")]
    UserNotFound,

    #[error("token encoding failed: {0}")]
    Encoding(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
