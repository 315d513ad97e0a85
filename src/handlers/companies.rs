//! Company endpoints. Reads are public; any verified account may write.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::role::ANY_ROLE;
use crate::catalog::{Company, CompanyPatch, CompanyService, NewCompany};
use crate::error::ApiError;
use crate::state::AppState;

use super::parse_uid;

/// A rename collides when a different live row already holds the target name.
fn name_taken_by_other(existing: Option<&Company>, uid: Uuid) -> bool {
    existing.map_or(false, |company| company.uid != uid)
}

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub description: Option<String>,
    pub partner_uid: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub partner_uid: Option<Uuid>,
}

/// GET /companies
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let companies = CompanyService::new(state.pool.clone()).list().await?;
    Ok(Json(companies))
}

/// GET /companies/{uid}
pub async fn get(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let uid = parse_uid(&uid)?;
    let company = CompanyService::new(state.pool.clone())
        .get(uid)
        .await?
        .ok_or(ApiError::CompanyNotFound)?;
    Ok(Json(company))
}

/// GET /companies/name/{name}
pub async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let company = CompanyService::new(state.pool.clone())
        .get_by_name(&name)
        .await?
        .ok_or(ApiError::CompanyNotFound)?;
    Ok(Json(company))
}

/// POST /companies
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let caller = state.require_user(&headers, &ANY_ROLE).await?;
    let service = CompanyService::new(state.pool.clone());

    if service.get_by_name(&payload.name).await?.is_some() {
        return Err(ApiError::CompanyAlreadyExists);
    }

    let company = service
        .create(
            NewCompany {
                name: payload.name,
                description: payload.description,
                partner_uid: payload.partner_uid,
            },
            caller.uid,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// PATCH /companies/{uid}
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uid): Path<String>,
    Json(payload): Json<UpdateCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_user(&headers, &ANY_ROLE).await?;
    let uid = parse_uid(&uid)?;
    let service = CompanyService::new(state.pool.clone());

    if let Some(name) = &payload.name {
        if name_taken_by_other(service.get_by_name(name).await?.as_ref(), uid) {
            return Err(ApiError::CompanyAlreadyExists);
        }
    }

    let company = service
        .update(
            uid,
            CompanyPatch {
                name: payload.name,
                description: payload.description,
                partner_uid: payload.partner_uid,
            },
        )
        .await?
        .ok_or(ApiError::CompanyNotFound)?;
    Ok(Json(company))
}

/// DELETE /companies/{uid}
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uid): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.require_user(&headers, &ANY_ROLE).await?;
    let uid = parse_uid(&uid)?;

    if !CompanyService::new(state.pool.clone()).soft_delete(uid).await? {
        return Err(ApiError::CompanyNotFound);
    }
    Ok(Json(json!({ "message": "Company deleted successfully" })))
}
