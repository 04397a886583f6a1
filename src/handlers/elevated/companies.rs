// handlers/elevated/companies.rs - company writes

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use serde::Serialize;

use crate::database::models::{Company, CompanyUpdate, NewCompany};
use crate::handlers::{json_body, validated};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CompanyService;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: String,
}

/// POST /companies
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewCompany>, JsonRejection>,
) -> ApiResult<Company> {
    let data = json_body(payload)?;
    validated(data.validate())?;

    let mut tx = state.db.begin().await?;
    let company = CompanyService::create(&mut tx, &data).await?;
    tx.commit().await?;

    Ok(ApiResponse::created(company))
}

/// PATCH /companies/:handle
pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    payload: Result<Json<CompanyUpdate>, JsonRejection>,
) -> ApiResult<Company> {
    let data = json_body(payload)?;
    validated(data.validate())?;

    let mut tx = state.db.begin().await?;
    let company = CompanyService::update(&mut tx, &handle, &data).await?;
    tx.commit().await?;

    Ok(ApiResponse::success(company))
}

/// DELETE /companies/:handle
pub async fn remove(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Deleted> {
    let mut tx = state.db.begin().await?;
    CompanyService::remove(&mut tx, &handle).await?;
    tx.commit().await?;

    Ok(ApiResponse::success(Deleted { deleted: handle }))
}
