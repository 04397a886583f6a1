// handlers/elevated/jobs.rs - job writes

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use serde::Serialize;

use crate::database::models::{Job, JobUpdate, NewJob};
use crate::handlers::{json_body, validated};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::JobService;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: i32,
}

/// POST /jobs
pub async fn create(State(state): State<AppState>, payload: Result<Json<NewJob>, JsonRejection>) -> ApiResult<Job> {
    let data = json_body(payload)?;
    validated(data.validate())?;

    let mut tx = state.db.begin().await?;
    let job = JobService::create(&mut tx, &data).await?;
    tx.commit().await?;

    Ok(ApiResponse::created(job))
}

/// PATCH /jobs/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<JobUpdate>, JsonRejection>,
) -> ApiResult<Job> {
    let data = json_body(payload)?;
    validated(data.validate())?;

    let mut tx = state.db.begin().await?;
    let job = JobService::update(&mut tx, id, &data).await?;
    tx.commit().await?;

    Ok(ApiResponse::success(job))
}

/// DELETE /jobs/:id
pub async fn remove(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Deleted> {
    let mut tx = state.db.begin().await?;
    JobService::remove(&mut tx, id).await?;
    tx.commit().await?;

    Ok(ApiResponse::success(Deleted { deleted: id }))
}
