//! Router assembly: versioned API surface plus the health probe.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::database;
use crate::handlers;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/auth", auth_routes())
        .nest("/api/v1/users/", user_routes())
        .nest("/api/v1/products/", product_routes())
        .nest("/api/v1/categories/", category_routes())
        .nest("/api/v1/companies/", company_routes())
        .nest("/api/v1/stores/", store_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/verify/:token", get(handlers::auth::verify))
        .route("/login", post(handlers::auth::login))
        .route("/refresh_token", get(handlers::auth::refresh_token))
        .route("/me", get(handlers::auth::me))
        .route("/logout", get(handlers::auth::logout))
        .route(
            "/password-reset-request",
            post(handlers::auth::password_reset_request),
        )
        .route(
            "/password-reset-confirm/:token",
            post(handlers::auth::password_reset_confirm),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::users::list).post(handlers::users::create_partner),
        )
        .route("/password", patch(handlers::users::change_password))
        .route(
            "/:uid",
            get(handlers::users::get)
                .patch(handlers::users::update)
                .delete(handlers::users::delete),
        )
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::products::list).post(handlers::products::create),
        )
        .route(
            "/:uid",
            get(handlers::products::get)
                .patch(handlers::products::update)
                .delete(handlers::products::delete),
        )
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::categories::list).post(handlers::categories::create),
        )
        .route(
            "/:uid",
            get(handlers::categories::get)
                .patch(handlers::categories::update)
                .delete(handlers::categories::delete),
        )
}

fn company_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::companies::list).post(handlers::companies::create),
        )
        .route("/name/:name", get(handlers::companies::get_by_name))
        .route(
            "/:uid",
            get(handlers::companies::get)
                .patch(handlers::companies::update)
                .delete(handlers::companies::delete),
        )
}

fn store_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::stores::list).post(handlers::stores::create),
        )
        .route(
            "/:uid",
            get(handlers::stores::get)
                .patch(handlers::stores::update)
                .delete(handlers::stores::delete),
        )
}

/// GET /health
///
/// Reports degraded instead of failing outright when the database is
/// unreachable, so orchestration can tell "process up" from "fully serving".
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match database::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "up" })),
        ),
        Err(err) => {
            tracing::warn!("health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "down" })),
            )
        }
    }
}
