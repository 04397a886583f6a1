// handlers/public/companies.rs - GET /companies, GET /companies/:handle

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};

use crate::database::models::{CompanyDetail, CompanyListing};
use crate::filter::{compose_company_filter, CompanyFilter};
use crate::handlers::query_params;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::CompanyService;
use crate::AppState;

/// GET /companies - all companies, or those matching the query criteria
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<CompanyFilter>, QueryRejection>,
) -> ApiResult<CompanyListing> {
    let criteria = query_params(params)?;
    // Bound errors surface before a connection is taken.
    let query = compose_company_filter(&criteria)?;

    let mut conn = state.db.pool().acquire().await?;
    let listing = CompanyService::find_matching(&mut conn, &query).await?;
    Ok(ApiResponse::success(listing))
}

/// GET /companies/:handle - one company with its jobs
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<CompanyDetail> {
    let mut conn = state.db.pool().acquire().await?;
    let company = CompanyService::get(&mut conn, &handle).await?;
    Ok(ApiResponse::success(company))
}
