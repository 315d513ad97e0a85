//! Category endpoints. Reads are public; writes are admin only.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use uuid::Uuid;

use crate::auth::role::ADMIN_ONLY;
use crate::catalog::{Category, CategoryService};
use crate::error::ApiError;
use crate::state::AppState;

use super::parse_uid;

/// A rename collides when a different row already holds the target name.
fn name_taken_by_other(existing: Option<&Category>, uid: Uuid) -> bool {
    existing.map_or(false, |category| category.uid != uid)
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

/// GET /categories
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let categories = CategoryService::new(state.pool.clone()).list().await?;
    Ok(Json(categories))
}

/// GET /categories/{uid}
pub async fn get(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let uid = parse_uid(&uid)?;
    let category = CategoryService::new(state.pool.clone())
        .get(uid)
        .await?
        .ok_or(ApiError::CategoryNotFound)?;
    Ok(Json(category))
}

/// POST /categories
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_user(&headers, &ADMIN_ONLY).await?;
    let service = CategoryService::new(state.pool.clone());

    if service.get_by_name(&payload.name).await?.is_some() {
        return Err(ApiError::CategoryAlreadyExists);
    }

    let category = service.create(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PATCH /categories/{uid}
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uid): Path<String>,
    Json(payload): Json<CategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_user(&headers, &ADMIN_ONLY).await?;
    let uid = parse_uid(&uid)?;
    let service = CategoryService::new(state.pool.clone());

    // Renaming onto another category's name is the same conflict as creating it
    if name_taken_by_other(service.get_by_name(&payload.name).await?.as_ref(), uid) {
        return Err(ApiError::CategoryAlreadyExists);
    }

    let category = service
        .update(uid, &payload.name)
        .await?
        .ok_or(ApiError::CategoryNotFound)?;
    Ok(Json(category))
}

/// DELETE /categories/{uid}
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_user(&headers, &ADMIN_ONLY).await?;
    let uid = parse_uid(&uid)?;

    if !CategoryService::new(state.pool.clone()).delete(uid).await? {
        return Err(ApiError::CategoryNotFound);
    }
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(name: &str) -> Category {
        Category {
            uid: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn rename_onto_another_category_collides() {
        let other = category("Bebidas");
        assert!(name_taken_by_other(Some(&other), Uuid::new_v4()));
    }

    #[test]
    fn keeping_or_reclaiming_your_own_name_does_not_collide() {
        let own = category("Bebidas");
        assert!(!name_taken_by_other(Some(&own), own.uid));
        assert!(!name_taken_by_other(None, Uuid::new_v4()));
    }
}
