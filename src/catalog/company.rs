use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Company {
    pub uid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub user_uid: Option<Uuid>,
    /// Partner account managing this company, when one is assigned.
    pub partner_uid: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewCompany {
    pub name: String,
    pub description: Option<String>,
    pub partner_uid: Option<Uuid>,
}

#[derive(Debug, Default)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub partner_uid: Option<Uuid>,
}

pub struct CompanyService {
    pool: PgPool,
}

impl CompanyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Company>, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE is_deleted = FALSE ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, uid: Uuid) -> Result<Option<Company>, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE uid = $1 AND is_deleted = FALSE",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Company>, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE name = $1 AND is_deleted = FALSE",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create(&self, new: NewCompany, user_uid: Uuid) -> Result<Company, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            "INSERT INTO companies (uid, name, description, user_uid, partner_uid) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.description)
        .bind(user_uid)
        .bind(new.partner_uid)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(
        &self,
        uid: Uuid,
        patch: CompanyPatch,
    ) -> Result<Option<Company>, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            "UPDATE companies SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                partner_uid = COALESCE($4, partner_uid), \
                updated_at = now() \
             WHERE uid = $1 AND is_deleted = FALSE RETURNING *",
        )
        .bind(uid)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.partner_uid)
        .fetch_optional(&self.pool)
        .await
    }

    /// Companies are never physically removed; rows are flagged so store
    /// price history keeps its references.
    pub async fn soft_delete(&self, uid: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE companies SET is_deleted = TRUE, updated_at = now() \
             WHERE uid = $1 AND is_deleted = FALSE",
        )
        .bind(uid)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
