//! User administration endpoints.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::auth::role::{ADMIN_ONLY, ANY_ROLE};
use crate::auth::{password, AuthError};
use crate::config::config;
use crate::error::ApiError;
use crate::state::AppState;
use crate::user::{Role, User};

use super::parse_uid;

#[derive(Debug, Deserialize)]
pub struct CreatePartnerRequest {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub fullname: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

/// GET /users
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    state.require_user(&headers, &ADMIN_ONLY).await?;
    let users = state.users.list().await?;
    Ok(Json(users))
}

/// POST /users
///
/// Admin-only creation of a partner account. Public signup always produces
/// the plain user role; this is the only path that assigns `partner`. The
/// new account still verifies through the usual email link.
pub async fn create_partner(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePartnerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_user(&headers, &ADMIN_ONLY).await?;

    if state.users.find_by_email(&payload.email).await?.is_some() {
        return Err(AuthError::UserAlreadyExists.into());
    }

    let cfg = config();
    let digest = password::hash(&payload.password, cfg.security.bcrypt_cost)?;
    let mut user = User::new(&payload.fullname, &payload.email, &digest);
    user.role = Role::Partner.as_str().to_string();
    if !state.users.insert(&user).await? {
        return Err(AuthError::UserAlreadyExists.into());
    }

    let token = state
        .safe_tokens
        .issue(&user.email, cfg.security.safe_token_ttl_secs)?;
    let link = format!("http://{}/api/v1/auth/verify/{}", cfg.api.domain, token);
    let html = format!(
        "<h1>Verify your email</h1><p>Click <a href=\"{link}\">this link</a> to verify your account.</p>"
    );
    if let Err(err) = state.mailer.send(&user.email, "Verify your email", &html).await {
        tracing::warn!(email = %user.email, "verification mail not sent: {}", err);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Partner account created. Check the email to verify the account.",
            "user": user,
        })),
    ))
}

/// GET /users/{uid}
pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_user(&headers, &ANY_ROLE).await?;
    let uid = parse_uid(&uid)?;
    let user = state
        .users
        .find_by_id(uid)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    Ok(Json(user))
}

/// PATCH /users/{uid}
///
/// Users may rename themselves; admins may rename anyone.
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uid): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = state.require_user(&headers, &ANY_ROLE).await?;
    let uid = parse_uid(&uid)?;

    if caller.uid != uid && Role::parse(&caller.role) != Some(Role::Admin) {
        return Err(AuthError::InsufficientPermission.into());
    }

    let user = state
        .users
        .update_fullname(uid, &payload.fullname)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    Ok(Json(user))
}

/// DELETE /users/{uid}
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_user(&headers, &ADMIN_ONLY).await?;
    let uid = parse_uid(&uid)?;

    if !state.users.delete(uid).await? {
        return Err(ApiError::UserNotFound);
    }
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

/// PATCH /users/password
///
/// Callers change their own password by proving the old one.
pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = state.require_user(&headers, &ANY_ROLE).await?;

    if payload.new_password != payload.confirm_new_password {
        return Err(ApiError::PasswordMismatch);
    }
    if payload.new_password == payload.old_password {
        return Err(ApiError::PasswordUnchanged);
    }
    if !password::verify(&payload.old_password, &caller.password_hash) {
        return Err(AuthError::InvalidCredentials.into());
    }

    let digest = password::hash(&payload.new_password, config().security.bcrypt_cost)?;
    state.users.set_password_hash(caller.uid, &digest).await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}
