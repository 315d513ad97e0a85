use axum::http::HeaderMap;
use std::sync::Arc;

use super::error::AuthError;
use super::revocation::RevocationStore;
use super::token::{Claims, TokenCodec, TokenKind};

/// Per-request bearer-token verification.
///
/// Each check runs in order and short-circuits with a specific rejection:
/// credential extraction, signature/expiry decode, revocation lookup, then
/// kind match. Malformed tokens never reach the revocation store. One gate
/// handles both kinds; callers pass the kind the route requires.
pub struct BearerGate {
    codec: TokenCodec,
    revocation: Arc<dyn RevocationStore>,
}

impl BearerGate {
    pub fn new(codec: TokenCodec, revocation: Arc<dyn RevocationStore>) -> Self {
        Self { codec, revocation }
    }

    /// Verify the request's bearer credential and return its claims.
    pub async fn authenticate(
        &self,
        headers: &HeaderMap,
        required: TokenKind,
    ) -> Result<Claims, AuthError> {
        let token = extract_bearer(headers)?;
        self.authenticate_token(&token, required).await
    }

    /// Verify an already-extracted credential.
    pub async fn authenticate_token(
        &self,
        token: &str,
        required: TokenKind,
    ) -> Result<Claims, AuthError> {
        let claims = self.codec.decode(token).ok_or(AuthError::InvalidToken)?;

        if self.revocation.is_revoked(claims.jti).await? {
            return Err(AuthError::RevokedToken);
        }

        match (required, claims.kind) {
            (TokenKind::Access, TokenKind::Refresh) => Err(AuthError::AccessTokenRequired),
            (TokenKind::Refresh, TokenKind::Access) => Err(AuthError::RefreshTokenRequired),
            _ => Ok(claims),
        }
    }
}

/// Pull the bearer credential out of the Authorization header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = headers
        .get("authorization")
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MissingCredential)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        _ => Err(AuthError::MissingCredential),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;

    use crate::auth::error::StorageError;

    /// In-memory revocation store that also counts lookups, so tests can
    /// assert the gate never consults it for malformed tokens.
    #[derive(Default)]
    struct MemoryRevocationStore {
        revoked: Mutex<HashMap<Uuid, DateTime<Utc>>>,
        lookups: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RevocationStore for MemoryRevocationStore {
        async fn is_revoked(&self, token_id: Uuid) -> Result<bool, StorageError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.revoked.lock().unwrap().contains_key(&token_id))
        }

        async fn revoke(
            &self,
            token_id: Uuid,
            expires_at: DateTime<Utc>,
        ) -> Result<(), StorageError> {
            self.revoked
                .lock()
                .unwrap()
                .entry(token_id)
                .or_insert(expires_at);
            Ok(())
        }

        async fn prune_expired(&self) -> Result<u64, StorageError> {
            let mut revoked = self.revoked.lock().unwrap();
            let before = revoked.len();
            let now = Utc::now();
            revoked.retain(|_, expires_at| *expires_at >= now);
            Ok((before - revoked.len()) as u64)
        }
    }

    fn gate() -> (BearerGate, Arc<MemoryRevocationStore>, TokenCodec) {
        let codec = TokenCodec::new("gate-test-secret");
        let store = Arc::new(MemoryRevocationStore::default());
        (
            BearerGate::new(codec.clone(), store.clone()),
            store,
            codec,
        )
    }

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", format!("Bearer {token}").parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn missing_credential_is_rejected() {
        let (gate, _, _) = gate();
        let err = gate
            .authenticate(&HeaderMap::new(), TokenKind::Access)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::MissingCredential);

        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Basic abc".parse().unwrap());
        let err = gate
            .authenticate(&headers, TokenKind::Access)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::MissingCredential);
    }

    #[tokio::test]
    async fn malformed_token_never_reaches_the_revocation_store() {
        let (gate, store, _) = gate();
        let err = gate
            .authenticate(&bearer_headers("garbage"), TokenKind::Access)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_access_token_authenticates() {
        let (gate, _, codec) = gate();
        let uid = Uuid::new_v4();
        let token = codec
            .issue("ana@example.com", uid, TokenKind::Access, Duration::hours(1))
            .unwrap();
        let claims = gate
            .authenticate(&bearer_headers(&token), TokenKind::Access)
            .await
            .unwrap();
        assert_eq!(claims.user_uid, uid);
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[tokio::test]
    async fn kind_mismatch_is_rejected_both_ways() {
        let (gate, _, codec) = gate();
        let uid = Uuid::new_v4();
        let refresh = codec
            .issue("ana@example.com", uid, TokenKind::Refresh, Duration::days(2))
            .unwrap();
        let access = codec
            .issue("ana@example.com", uid, TokenKind::Access, Duration::hours(1))
            .unwrap();

        let err = gate
            .authenticate(&bearer_headers(&refresh), TokenKind::Access)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::AccessTokenRequired);

        let err = gate
            .authenticate(&bearer_headers(&access), TokenKind::Refresh)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::RefreshTokenRequired);
    }

    #[tokio::test]
    async fn revoked_token_is_rejected_before_kind_check() {
        let (gate, store, codec) = gate();
        let token = codec
            .issue(
                "ana@example.com",
                Uuid::new_v4(),
                TokenKind::Refresh,
                Duration::days(2),
            )
            .unwrap();
        let claims = codec.decode(&token).unwrap();
        store
            .revoke(claims.jti, Utc::now() + Duration::days(2))
            .await
            .unwrap();

        // Wrong kind for the gate too, but revocation wins
        let err = gate
            .authenticate(&bearer_headers(&token), TokenKind::Access)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::RevokedToken);
    }

    #[tokio::test]
    async fn revocation_is_idempotent() {
        let (gate, store, codec) = gate();
        let token = codec
            .issue(
                "ana@example.com",
                Uuid::new_v4(),
                TokenKind::Access,
                Duration::hours(1),
            )
            .unwrap();
        let claims = codec.decode(&token).unwrap();
        let expires_at = Utc::now() + Duration::hours(1);

        store.revoke(claims.jti, expires_at).await.unwrap();
        store.revoke(claims.jti, expires_at).await.unwrap();
        assert!(store.is_revoked(claims.jti).await.unwrap());

        let err = gate
            .authenticate(&bearer_headers(&token), TokenKind::Access)
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::RevokedToken);
    }

    #[tokio::test]
    async fn pruning_drops_only_expired_records() {
        let (_, store, _) = gate();
        let stale = Uuid::new_v4();
        let live = Uuid::new_v4();
        store
            .revoke(stale, Utc::now() - Duration::hours(1))
            .await
            .unwrap();
        store
            .revoke(live, Utc::now() + Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(store.prune_expired().await.unwrap(), 1);
        assert!(!store.is_revoked(stale).await.unwrap());
        assert!(store.is_revoked(live).await.unwrap());
    }
}
