use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::error::StorageError;

/// Persistent set of revoked token identifiers.
///
/// Queried on every authenticated request, so lookups must be indexed point
/// reads. Records are insert-only; a revoked id stays revoked. Entries may be
/// pruned once their `expires_at` passes — the token would fail the expiry
/// check anyway.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Point lookup by token identifier (the `jti` claim).
    async fn is_revoked(&self, token_id: Uuid) -> Result<bool, StorageError>;

    /// Insert a revocation record. Idempotent: revoking an already-revoked
    /// id is a no-op. Atomic: the record either exists or it does not.
    async fn revoke(&self, token_id: Uuid, expires_at: DateTime<Utc>) -> Result<(), StorageError>;

    /// Delete records whose tokens have expired naturally. Optional
    /// maintenance; correctness never depends on it. Returns rows removed.
    async fn prune_expired(&self) -> Result<u64, StorageError>;
}

/// PostgreSQL-backed revocation store over the `revoked_tokens` table.
pub struct PgRevocationStore {
    pool: PgPool,
}

impl PgRevocationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevocationStore for PgRevocationStore {
    async fn is_revoked(&self, token_id: Uuid) -> Result<bool, StorageError> {
        let revoked: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token_id = $1)")
                .bind(token_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(revoked)
    }

    async fn revoke(&self, token_id: Uuid, expires_at: DateTime<Utc>) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO revoked_tokens (id, token_id, revoked_at, expires_at) \
             VALUES ($1, $2, now(), $3) \
             ON CONFLICT (token_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(token_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn prune_expired(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < now()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
