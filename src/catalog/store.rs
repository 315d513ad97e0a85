use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A product's price listing at a specific company. At most one live entry
/// per (company, product) pair; the pairing check is done in code so a
/// soft-deleted entry does not block re-listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StoreEntry {
    pub uid: Uuid,
    pub price: f64,
    pub wholesale_price: Option<f64>,
    /// Discount over the listed price, in whole percent.
    pub discount: Option<i32>,
    pub is_deleted: bool,
    pub user_uid: Option<Uuid>,
    pub product_uid: Uuid,
    pub company_uid: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewStoreEntry {
    pub price: f64,
    pub wholesale_price: Option<f64>,
    pub discount: Option<i32>,
    pub product_uid: Uuid,
    pub company_uid: Uuid,
}

#[derive(Debug, Default)]
pub struct StoreEntryPatch {
    pub price: Option<f64>,
    pub wholesale_price: Option<f64>,
    pub discount: Option<i32>,
}

pub struct StoreService {
    pool: PgPool,
}

impl StoreService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<StoreEntry>, sqlx::Error> {
        sqlx::query_as::<_, StoreEntry>(
            "SELECT * FROM stores WHERE is_deleted = FALSE ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn list_by_company(&self, company_uid: Uuid) -> Result<Vec<StoreEntry>, sqlx::Error> {
        sqlx::query_as::<_, StoreEntry>(
            "SELECT * FROM stores WHERE company_uid = $1 AND is_deleted = FALSE \
             ORDER BY created_at DESC",
        )
        .bind(company_uid)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get(&self, uid: Uuid) -> Result<Option<StoreEntry>, sqlx::Error> {
        sqlx::query_as::<_, StoreEntry>(
            "SELECT * FROM stores WHERE uid = $1 AND is_deleted = FALSE",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_by_company_product(
        &self,
        company_uid: Uuid,
        product_uid: Uuid,
    ) -> Result<Option<StoreEntry>, sqlx::Error> {
        sqlx::query_as::<_, StoreEntry>(
            "SELECT * FROM stores \
             WHERE company_uid = $1 AND product_uid = $2 AND is_deleted = FALSE",
        )
        .bind(company_uid)
        .bind(product_uid)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn create(
        &self,
        new: NewStoreEntry,
        user_uid: Uuid,
    ) -> Result<StoreEntry, sqlx::Error> {
        sqlx::query_as::<_, StoreEntry>(
            "INSERT INTO stores \
                (uid, price, wholesale_price, discount, user_uid, product_uid, company_uid) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(new.price)
        .bind(new.wholesale_price)
        .bind(new.discount)
        .bind(user_uid)
        .bind(new.product_uid)
        .bind(new.company_uid)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(
        &self,
        uid: Uuid,
        patch: StoreEntryPatch,
    ) -> Result<Option<StoreEntry>, sqlx::Error> {
        sqlx::query_as::<_, StoreEntry>(
            "UPDATE stores SET \
                price = COALESCE($2, price), \
                wholesale_price = COALESCE($3, wholesale_price), \
                discount = COALESCE($4, discount), \
                updated_at = now() \
             WHERE uid = $1 AND is_deleted = FALSE RETURNING *",
        )
        .bind(uid)
        .bind(patch.price)
        .bind(patch.wholesale_price)
        .bind(patch.discount)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn soft_delete(&self, uid: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE stores SET is_deleted = TRUE, updated_at = now() \
             WHERE uid = $1 AND is_deleted = FALSE",
        )
        .bind(uid)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
