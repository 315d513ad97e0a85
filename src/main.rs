use anyhow::{bail, Context};

use miprecio_api::config::config;
use miprecio_api::database;
use miprecio_api::routes;
use miprecio_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "miprecio_api=info,tower_http=info".into()),
        )
        .init();

    let cfg = config();
    if cfg.security.jwt_secret.is_empty() || cfg.security.safe_token_secret.is_empty() {
        bail!("JWT_SECRET and SAFE_TOKEN_SECRET must be set outside development");
    }

    let pool = database::connect(&cfg.database)
        .await
        .context("database connection failed")?;
    database::init_schema(&pool)
        .await
        .context("schema initialization failed")?;

    let state = AppState::postgres(pool);
    let app = routes::app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("could not bind port {port}"))?;

    println!("🚀 MiPrecio API listening on http://0.0.0.0:{port}");
    tracing::info!(port, environment = ?cfg.environment, "server started");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
