// handlers/public/jobs.rs - GET /jobs, GET /jobs/:id

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};

use crate::database::models::Job;
use crate::filter::{compose_job_filter, JobFilter};
use crate::handlers::query_params;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::JobService;
use crate::AppState;

/// GET /jobs - all jobs, or those matching the query criteria
pub async fn list(State(state): State<AppState>, params: Result<Query<JobFilter>, QueryRejection>) -> ApiResult<Vec<Job>> {
    let criteria = query_params(params)?;
    let query = compose_job_filter(&criteria)?;

    let mut conn = state.db.pool().acquire().await?;
    let jobs = JobService::find_matching(&mut conn, &query).await?;
    Ok(ApiResponse::success(jobs))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Job> {
    let mut conn = state.db.pool().acquire().await?;
    let job = JobService::get(&mut conn, id).await?;
    Ok(ApiResponse::success(job))
}
