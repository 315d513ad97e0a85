//! Shared application state injected into every handler.
//!
//! All collaborators live behind trait objects or cheap clones, so tests can
//! assemble a state with in-memory stores while production wires Postgres.

use std::sync::Arc;

use axum::http::HeaderMap;
use sqlx::PgPool;

use crate::auth::{
    AuthError, BearerGate, IdentityResolver, PgRevocationStore, RevocationStore, RoleGate,
    SafeTokenCodec, TokenCodec, TokenKind,
};
use crate::config::config;
use crate::mail::{LogMailer, Mailer};
use crate::user::{PgUserStore, User, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub users: Arc<dyn UserStore>,
    pub revocation: Arc<dyn RevocationStore>,
    pub tokens: TokenCodec,
    pub safe_tokens: SafeTokenCodec,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Production wiring: Postgres-backed stores, secrets from config.
    pub fn postgres(pool: PgPool) -> Self {
        let cfg = config();
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            revocation: Arc::new(PgRevocationStore::new(pool.clone())),
            tokens: TokenCodec::new(&cfg.security.jwt_secret),
            safe_tokens: SafeTokenCodec::new(&cfg.security.safe_token_secret),
            mailer: Arc::new(LogMailer),
            pool,
        }
    }

    pub fn gate(&self) -> BearerGate {
        BearerGate::new(self.tokens.clone(), self.revocation.clone())
    }

    pub fn identity(&self) -> IdentityResolver {
        IdentityResolver::new(self.users.clone())
    }

    /// Full access-token pipeline for protected routes: bearer check,
    /// identity lookup, role check. Returns the authenticated user.
    pub async fn require_user(
        &self,
        headers: &HeaderMap,
        roles: &RoleGate,
    ) -> Result<User, AuthError> {
        let claims = self.gate().authenticate(headers, TokenKind::Access).await?;
        let user = self
            .identity()
            .resolve(&claims)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        roles.check(&user)?;
        Ok(user)
    }
}
