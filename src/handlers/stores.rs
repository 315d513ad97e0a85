//! Store price listing endpoints: a product's price at a given company.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::role::ANY_ROLE;
use crate::catalog::{CompanyService, NewStoreEntry, ProductService, StoreEntryPatch, StoreService};
use crate::error::ApiError;
use crate::state::AppState;

use super::parse_uid;

#[derive(Debug, Deserialize)]
pub struct CreateStoreRequest {
    pub price: f64,
    pub wholesale_price: Option<f64>,
    pub discount: Option<i32>,
    pub product_uid: Uuid,
    pub company_uid: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStoreRequest {
    pub price: Option<f64>,
    pub wholesale_price: Option<f64>,
    pub discount: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct StoreListQuery {
    pub company_uid: Option<Uuid>,
}

/// GET /stores
///
/// Optionally filtered to one company with `?company_uid=`.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<StoreListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let service = StoreService::new(state.pool.clone());
    let entries = match query.company_uid {
        Some(company_uid) => service.list_by_company(company_uid).await?,
        None => service.list().await?,
    };
    Ok(Json(entries))
}

/// GET /stores/{uid}
pub async fn get(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let uid = parse_uid(&uid)?;
    let entry = StoreService::new(state.pool.clone())
        .get(uid)
        .await?
        .ok_or(ApiError::StoreNotFound)?;
    Ok(Json(entry))
}

/// POST /stores
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateStoreRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = state.require_user(&headers, &ANY_ROLE).await?;

    ProductService::new(state.pool.clone())
        .get(payload.product_uid)
        .await?
        .ok_or(ApiError::ProductNotFound)?;
    CompanyService::new(state.pool.clone())
        .get(payload.company_uid)
        .await?
        .ok_or(ApiError::CompanyNotFound)?;

    let service = StoreService::new(state.pool.clone());
    if service
        .find_by_company_product(payload.company_uid, payload.product_uid)
        .await?
        .is_some()
    {
        return Err(ApiError::StoreAlreadyExists);
    }

    let entry = service
        .create(
            NewStoreEntry {
                price: payload.price,
                wholesale_price: payload.wholesale_price,
                discount: payload.discount,
                product_uid: payload.product_uid,
                company_uid: payload.company_uid,
            },
            caller.uid,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PATCH /stores/{uid}
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uid): Path<String>,
    Json(payload): Json<UpdateStoreRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_user(&headers, &ANY_ROLE).await?;
    let uid = parse_uid(&uid)?;

    let entry = StoreService::new(state.pool.clone())
        .update(
            uid,
            StoreEntryPatch {
                price: payload.price,
                wholesale_price: payload.wholesale_price,
                discount: payload.discount,
            },
        )
        .await?
        .ok_or(ApiError::StoreNotFound)?;
    Ok(Json(entry))
}

/// DELETE /stores/{uid}
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_user(&headers, &ANY_ROLE).await?;
    let uid = parse_uid(&uid)?;

    if !StoreService::new(state.pool.clone()).soft_delete(uid).await? {
        return Err(ApiError::StoreNotFound);
    }
    Ok(Json(json!({ "message": "Store entry deleted successfully" })))
}
