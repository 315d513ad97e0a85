use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::StorageError;

use super::model::User;

/// User persistence seam consumed by the auth core and the user handlers.
///
/// The auth core only reads through this trait plus the two narrow write
/// operations it is allowed (verification flag, password hash).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;
    async fn find_by_id(&self, uid: Uuid) -> Result<Option<User>, StorageError>;
    /// Returns `false` when the email is already taken. The check and the
    /// write are one atomic statement, so two concurrent signups for the same
    /// email cannot both succeed.
    async fn insert(&self, user: &User) -> Result<bool, StorageError>;
    async fn set_verified(&self, uid: Uuid, verified: bool) -> Result<(), StorageError>;
    async fn set_password_hash(&self, uid: Uuid, password_hash: &str) -> Result<(), StorageError>;
    async fn list(&self) -> Result<Vec<User>, StorageError>;
    /// Returns the updated user, or `None` when the id does not exist.
    async fn update_fullname(&self, uid: Uuid, fullname: &str)
        -> Result<Option<User>, StorageError>;
    /// Returns whether a row was actually deleted.
    async fn delete(&self, uid: Uuid) -> Result<bool, StorageError>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, uid: Uuid) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE uid = $1")
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert(&self, user: &User) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "INSERT INTO users (uid, email, fullname, role, is_verified, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(user.uid)
        .bind(&user.email)
        .bind(&user.fullname)
        .bind(&user.role)
        .bind(user.is_verified)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_verified(&self, uid: Uuid, verified: bool) -> Result<(), StorageError> {
        sqlx::query("UPDATE users SET is_verified = $2, updated_at = now() WHERE uid = $1")
            .bind(uid)
            .bind(verified)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_password_hash(&self, uid: Uuid, password_hash: &str) -> Result<(), StorageError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE uid = $1")
            .bind(uid)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, StorageError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn update_fullname(
        &self,
        uid: Uuid,
        fullname: &str,
    ) -> Result<Option<User>, StorageError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET fullname = $2, updated_at = now() WHERE uid = $1 RETURNING *",
        )
        .bind(uid)
        .bind(fullname)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete(&self, uid: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM users WHERE uid = $1")
            .bind(uid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
