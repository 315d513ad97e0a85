//! Product catalog endpoints. Reads are public; writes need an admin or
//! partner account.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::role::ADMIN_OR_PARTNER;
use crate::catalog::{CategoryService, NewProduct, ProductPatch, ProductService};
use crate::error::ApiError;
use crate::state::AppState;

use super::parse_uid;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub category_uid: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category_uid: Option<Uuid>,
}

/// GET /products
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let products = ProductService::new(state.pool.clone()).list().await?;
    Ok(Json(products))
}

/// GET /products/{uid}
pub async fn get(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let uid = parse_uid(&uid)?;
    let product = ProductService::new(state.pool.clone())
        .get(uid)
        .await?
        .ok_or(ApiError::ProductNotFound)?;
    Ok(Json(product))
}

/// POST /products
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = state.require_user(&headers, &ADMIN_OR_PARTNER).await?;
    let service = ProductService::new(state.pool.clone());

    if service.get_by_name(&payload.name).await?.is_some() {
        return Err(ApiError::ProductAlreadyExists);
    }
    if let Some(category_uid) = payload.category_uid {
        CategoryService::new(state.pool.clone())
            .get(category_uid)
            .await?
            .ok_or(ApiError::CategoryNotFound)?;
    }

    let product = service
        .create(
            NewProduct {
                name: payload.name,
                price: payload.price,
                description: payload.description,
                category_uid: payload.category_uid,
            },
            caller.uid,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PATCH /products/{uid}
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uid): Path<String>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_user(&headers, &ADMIN_OR_PARTNER).await?;
    let uid = parse_uid(&uid)?;

    if let Some(category_uid) = payload.category_uid {
        CategoryService::new(state.pool.clone())
            .get(category_uid)
            .await?
            .ok_or(ApiError::CategoryNotFound)?;
    }

    let product = ProductService::new(state.pool.clone())
        .update(
            uid,
            ProductPatch {
                name: payload.name,
                price: payload.price,
                description: payload.description,
                category_uid: payload.category_uid,
            },
        )
        .await?
        .ok_or(ApiError::ProductNotFound)?;
    Ok(Json(product))
}

/// DELETE /products/{uid}
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_user(&headers, &ADMIN_OR_PARTNER).await?;
    let uid = parse_uid(&uid)?;

    if !ProductService::new(state.pool.clone()).delete(uid).await? {
        return Err(ApiError::ProductNotFound);
    }
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
