//! Postgres connection handling and schema bootstrap.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Connect a pool using `DATABASE_URL` and the configured limits.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL is not set".into()))?;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(&url)
        .await
}

/// Create the schema if it does not exist yet. Statements run one at a time;
/// Postgres will not prepare a multi-statement string.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            uid UUID PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            fullname TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user',
            is_verified BOOLEAN NOT NULL DEFAULT FALSE,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS revoked_tokens (
            id UUID PRIMARY KEY,
            token_id UUID NOT NULL UNIQUE,
            revoked_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            expires_at TIMESTAMPTZ NOT NULL
        )
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_revoked_tokens_expires_at
            ON revoked_tokens (expires_at)
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            uid UUID PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS products (
            uid UUID PRIMARY KEY,
            name TEXT NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            description TEXT,
            user_uid UUID REFERENCES users (uid) ON DELETE SET NULL,
            category_uid UUID REFERENCES categories (uid) ON DELETE SET NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            uid UUID PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
            user_uid UUID REFERENCES users (uid) ON DELETE SET NULL,
            partner_uid UUID REFERENCES users (uid) ON DELETE SET NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS stores (
            uid UUID PRIMARY KEY,
            price DOUBLE PRECISION NOT NULL,
            wholesale_price DOUBLE PRECISION,
            discount INTEGER,
            is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
            user_uid UUID REFERENCES users (uid) ON DELETE SET NULL,
            product_uid UUID NOT NULL REFERENCES products (uid) ON DELETE CASCADE,
            company_uid UUID NOT NULL REFERENCES companies (uid) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("database schema ready");
    Ok(())
}

/// Cheap liveness probe for the health endpoint.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
