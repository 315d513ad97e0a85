//! Account and session endpoints: signup, verification, login, token
//! refresh, logout and password reset.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::auth::role::ANY_ROLE;
use crate::auth::{password, AuthError, TokenKind};
use crate::config::config;
use crate::error::ApiError;
use crate::state::AppState;
use crate::user::User;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub new_password: String,
    pub confirm_new_password: String,
}

/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if state.users.find_by_email(&payload.email).await?.is_some() {
        return Err(AuthError::UserAlreadyExists.into());
    }

    let cfg = config();
    let digest = password::hash(&payload.password, cfg.security.bcrypt_cost)?;
    let user = User::new(&payload.fullname, &payload.email, &digest);
    // The insert is the authoritative uniqueness check; the lookup above only
    // spares the bcrypt work on the common duplicate case
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
    // Delivery problems must not lose the account that was just created
    if let Err(err) = state.mailer.send(&user.email, "Verify your email", &html).await {
        tracing::warn!(email = %user.email, "verification mail not sent: {}", err);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Account created. Check your email to verify the account.",
            "user": user,
        })),
    ))
}

/// GET /verify/{token}
pub async fn verify(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let email = state
        .safe_tokens
        .decode(&token)
        .ok_or(AuthError::InvalidToken)?;

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    state.users.set_verified(user.uid, true).await?;

    Ok(Json(json!({ "message": "Account verified successfully" })))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Same rejection for unknown email and wrong password
    let user = state
        .users
        .find_by_email(&payload.email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;
    if !password::verify(&payload.password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials.into());
    }

    let cfg = config();
    let access = state.tokens.issue(
        &user.email,
        user.uid,
        TokenKind::Access,
        Duration::seconds(cfg.security.access_token_ttl_secs),
    )?;
    let refresh = state.tokens.issue(
        &user.email,
        user.uid,
        TokenKind::Refresh,
        Duration::days(cfg.security.refresh_token_ttl_days),
    )?;

    Ok(Json(json!({
        "message": "Login successful",
        "access_token": access,
        "refresh_token": refresh,
        "user": { "email": user.email, "uid": user.uid },
    })))
}

/// GET /refresh_token
///
/// Requires a refresh bearer; returns a fresh access token. The refresh
/// token itself stays valid until it expires or is revoked.
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let claims = state
        .gate()
        .authenticate(&headers, TokenKind::Refresh)
        .await?;

    let access = state.tokens.issue(
        &claims.sub,
        claims.user_uid,
        TokenKind::Access,
        Duration::seconds(config().security.access_token_ttl_secs),
    )?;

    Ok(Json(json!({ "access_token": access })))
}

/// GET /me
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.require_user(&headers, &ANY_ROLE).await?;
    Ok(Json(user))
}

/// GET /logout
///
/// Revokes the presented access token by its jti. The revocation record
/// carries the token's expiry so the store can prune it once it would have
/// died anyway.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let claims = state
        .gate()
        .authenticate(&headers, TokenKind::Access)
        .await?;

    let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);
    state.revocation.revoke(claims.jti, expires_at).await?;

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

/// POST /password-reset-request
///
/// Always answers 200 so the endpoint cannot be used to probe which emails
/// have accounts.
pub async fn password_reset_request(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if state.users.find_by_email(&payload.email).await?.is_some() {
        let cfg = config();
        let token = state
            .safe_tokens
            .issue(&payload.email, cfg.security.safe_token_ttl_secs)?;
        let link = format!(
            "http://{}/api/v1/auth/password-reset-confirm/{}",
            cfg.api.domain, token
        );
        let html = format!(
            "<h1>Reset your password</h1><p>Click <a href=\"{link}\">this link</a> to choose a new password.</p>"
        );
        if let Err(err) = state
            .mailer
            .send(&payload.email, "Reset your password", &html)
            .await
        {
            tracing::warn!(email = %payload.email, "reset mail not sent: {}", err);
        }
    }

    Ok(Json(json!({
        "message": "Check your email for instructions to reset your password",
    })))
}

/// POST /password-reset-confirm/{token}
pub async fn password_reset_confirm(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<PasswordResetConfirm>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.new_password != payload.confirm_new_password {
        return Err(ApiError::PasswordMismatch);
    }

    let email = state
        .safe_tokens
        .decode(&token)
        .ok_or(AuthError::InvalidToken)?;

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    let digest = password::hash(&payload.new_password, config().security.bcrypt_cost)?;
    state.users.set_password_hash(user.uid, &digest).await?;

    Ok(Json(json!({ "message": "Password reset successfully" })))
}
