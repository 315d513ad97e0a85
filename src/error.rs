// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::{AuthError, StorageError};

/// HTTP API error with stable machine-readable codes and client-safe messages
#[derive(Debug)]
pub enum ApiError {
    Auth(AuthError),

    // 404 Not Found
    UserNotFound,
    ProductNotFound,
    CategoryNotFound,
    CompanyNotFound,
    StoreNotFound,

    // 403 Conflicting resources
    ProductAlreadyExists,
    CategoryAlreadyExists,
    CompanyAlreadyExists,
    StoreAlreadyExists,

    // 400 Bad Request
    PasswordMismatch,
    PasswordUnchanged,
    InvalidUuid,
    BadRequest(String),

    // 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(err) => match err {
                AuthError::MissingCredential
                | AuthError::InvalidToken
                | AuthError::RevokedToken
                | AuthError::AccessTokenRequired
                | AuthError::InsufficientPermission => StatusCode::UNAUTHORIZED,
                AuthError::RefreshTokenRequired
                | AuthError::AccountNotVerified
                | AuthError::UserAlreadyExists => StatusCode::FORBIDDEN,
                AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::Encoding(_) | AuthError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::UserNotFound
            | ApiError::ProductNotFound
            | ApiError::CategoryNotFound
            | ApiError::CompanyNotFound
            | ApiError::StoreNotFound => StatusCode::NOT_FOUND,
            ApiError::ProductAlreadyExists
            | ApiError::CategoryAlreadyExists
            | ApiError::CompanyAlreadyExists
            | ApiError::StoreAlreadyExists => StatusCode::FORBIDDEN,
            ApiError::PasswordMismatch
            | ApiError::PasswordUnchanged
            | ApiError::InvalidUuid
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Auth(err) => match err {
                AuthError::MissingCredential => "missing_credential",
                AuthError::InvalidToken => "invalid_token",
                AuthError::RevokedToken => "token_revoked",
                AuthError::AccessTokenRequired => "access_token_required",
                AuthError::RefreshTokenRequired => "refresh_token_required",
                AuthError::InsufficientPermission => "insufficient_permissions",
                AuthError::AccountNotVerified => "account_not_verified",
                AuthError::InvalidCredentials => "invalid_email_or_password",
                AuthError::UserAlreadyExists => "user_exists",
                AuthError::UserNotFound => "user_not_found",
                AuthError::Encoding(_) | AuthError::Storage(_) => "internal_server_error",
            },
            ApiError::UserNotFound => "user_not_found",
            ApiError::ProductNotFound => "product_not_found",
            ApiError::CategoryNotFound => "category_not_found",
            ApiError::CompanyNotFound => "company_not_found",
            ApiError::StoreNotFound => "store_not_found",
            ApiError::ProductAlreadyExists => "product_exists",
            ApiError::CategoryAlreadyExists => "category_exists",
            ApiError::CompanyAlreadyExists => "company_exists",
            ApiError::StoreAlreadyExists => "store_exists",
            ApiError::PasswordMismatch => "password_not_match",
            ApiError::PasswordUnchanged => "password_match",
            ApiError::InvalidUuid => "invalid_request",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal_server_error",
        }
    }

    /// Client-safe error message. Internal details are logged, never exposed.
    pub fn message(&self) -> String {
        match self {
            ApiError::Auth(err) => match err {
                AuthError::Encoding(_) | AuthError::Storage(_) => {
                    "Oops! Something went wrong".to_string()
                }
                other => other.to_string(),
            },
            ApiError::UserNotFound => "User not found".to_string(),
            ApiError::ProductNotFound => "Product not found".to_string(),
            ApiError::CategoryNotFound => "Category not found".to_string(),
            ApiError::CompanyNotFound => "Company not found".to_string(),
            ApiError::StoreNotFound => "Store not found".to_string(),
            ApiError::ProductAlreadyExists => "Product already exists".to_string(),
            ApiError::CategoryAlreadyExists => "Category name already exists".to_string(),
            ApiError::CompanyAlreadyExists => "Company name already exists".to_string(),
            ApiError::StoreAlreadyExists => {
                "This product was already added to the store".to_string()
            }
            ApiError::PasswordMismatch => {
                "The new password and its confirmation do not match".to_string()
            }
            ApiError::PasswordUnchanged => {
                "The new password is the same as the old one".to_string()
            }
            ApiError::InvalidUuid => "Invalid request".to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Internal(_) => "Oops! Something went wrong".to_string(),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "message": self.message(),
            "error_code": self.error_code(),
        });

        // Token rejections tell the client how to recover
        if let ApiError::Auth(err) = self {
            let resolution = match err {
                AuthError::InvalidToken | AuthError::RevokedToken => {
                    Some("Please obtain a new token")
                }
                AuthError::AccessTokenRequired => Some("Please provide a valid access token"),
                AuthError::RefreshTokenRequired => Some("Please provide a valid refresh token"),
                AuthError::AccountNotVerified => Some("Please check your email for details"),
                _ => None,
            };
            if let Some(resolution) = resolution {
                body["resolution"] = json!(resolution);
            }
        }

        body
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Auth(AuthError::Storage(err))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::Internal(format!("password hashing failed: {err}"))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            // Log the real error; the client sees a generic message
            match &self {
                ApiError::Auth(AuthError::Storage(err)) => {
                    tracing::error!("storage error: {}", err)
                }
                ApiError::Auth(AuthError::Encoding(msg)) => {
                    tracing::error!("token encoding error: {}", msg)
                }
                ApiError::Internal(msg) => tracing::error!("internal error: {}", msg),
                other => tracing::error!("server error: {}", other),
            }
        }
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_rejections_map_to_stable_codes() {
        let cases = [
            (AuthError::MissingCredential, 401, "missing_credential"),
            (AuthError::InvalidToken, 401, "invalid_token"),
            (AuthError::RevokedToken, 401, "token_revoked"),
            (AuthError::AccessTokenRequired, 401, "access_token_required"),
            (AuthError::RefreshTokenRequired, 403, "refresh_token_required"),
            (
                AuthError::InsufficientPermission,
                401,
                "insufficient_permissions",
            ),
            (AuthError::AccountNotVerified, 403, "account_not_verified"),
            (
                AuthError::InvalidCredentials,
                400,
                "invalid_email_or_password",
            ),
            (AuthError::UserAlreadyExists, 403, "user_exists"),
            (AuthError::UserNotFound, 404, "user_not_found"),
        ];
        for (err, status, code) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status_code().as_u16(), status, "{code}");
            assert_eq!(api.error_code(), code);
        }
    }

    #[test]
    fn storage_failures_fail_closed_as_server_errors() {
        let api = ApiError::from(StorageError("connection refused".to_string()));
        assert_eq!(api.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error_code(), "internal_server_error");
        // No internal details leak into the body
        assert!(!api.to_json().to_string().contains("connection refused"));
    }

    #[test]
    fn token_rejections_carry_a_resolution_hint() {
        let body = ApiError::from(AuthError::RevokedToken).to_json();
        assert_eq!(body["error_code"], "token_revoked");
        assert!(body.get("resolution").is_some());

        let body = ApiError::ProductNotFound.to_json();
        assert!(body.get("resolution").is_none());
    }
}
