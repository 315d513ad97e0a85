use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub uid: Uuid,
    pub name: String,
    /// Suggested retail price; stores carry their own price on top.
    pub price: f64,
    pub description: Option<String>,
    pub user_uid: Option<Uuid>,
    pub category_uid: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub category_uid: Option<Uuid>,
}

#[derive(Debug, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category_uid: Option<Uuid>,
}

pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get(&self, uid: Uuid) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE uid = $1")
            .bind(uid)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create(&self, new: NewProduct, user_uid: Uuid) -> Result<Product, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (uid, name, price, description, user_uid, category_uid) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(new.price)
        .bind(&new.description)
        .bind(user_uid)
        .bind(new.category_uid)
        .fetch_one(&self.pool)
        .await
    }

    /// Partial update; absent fields keep their stored value.
    pub async fn update(
        &self,
        uid: Uuid,
        patch: ProductPatch,
    ) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            "UPDATE products SET \
                name = COALESCE($2, name), \
                price = COALESCE($3, price), \
                description = COALESCE($4, description), \
                category_uid = COALESCE($5, category_uid), \
                updated_at = now() \
             WHERE uid = $1 RETURNING *",
        )
        .bind(uid)
        .bind(patch.name)
        .bind(patch.price)
        .bind(patch.description)
        .bind(patch.category_uid)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, uid: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE uid = $1")
            .bind(uid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
