// handlers/protected/users.rs - per-user routes under /users/:username

use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Json, Path, State};
use serde::Serialize;

use crate::database::models::{ApplicationReceipt, User, UserDetail, UserUpdate};
use crate::error::ApiError;
use crate::handlers::{json_body, validated};
use crate::middleware::{ensure_correct_user_or_admin, ApiResponse, ApiResult, AuthUser};
use crate::services::UserService;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: String,
}

/// GET /users/:username
pub async fn get(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(username): Path<String>,
) -> ApiResult<UserDetail> {
    ensure_correct_user_or_admin(&caller, &username)?;

    let mut conn = state.db.pool().acquire().await?;
    let user = UserService::get(&mut conn, &username).await?;
    Ok(ApiResponse::success(user))
}

/// PATCH /users/:username
///
/// Only admins may set `isAdmin: true`.
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(username): Path<String>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> ApiResult<User> {
    ensure_correct_user_or_admin(&caller, &username)?;
    let data = json_body(payload)?;
    validated(data.validate())?;
    if data.grants_admin() && !caller.is_admin {
        return Err(ApiError::forbidden("Only admins may grant admin rights"));
    }

    let mut tx = state.db.begin().await?;
    let user = UserService::new(&state.config.security).update(&mut tx, &username, &data).await?;
    tx.commit().await?;

    Ok(ApiResponse::success(user))
}

/// DELETE /users/:username
pub async fn remove(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(username): Path<String>,
) -> ApiResult<Deleted> {
    ensure_correct_user_or_admin(&caller, &username)?;

    let mut tx = state.db.begin().await?;
    UserService::remove(&mut tx, &username).await?;
    tx.commit().await?;

    Ok(ApiResponse::success(Deleted { deleted: username }))
}

/// POST /users/:username/jobs/:id
pub async fn apply(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path((username, job_id)): Path<(String, i32)>,
) -> ApiResult<ApplicationReceipt> {
    ensure_correct_user_or_admin(&caller, &username)?;

    let mut tx = state.db.begin().await?;
    let receipt = UserService::apply_for_job(&mut tx, &username, job_id).await?;
    tx.commit().await?;

    Ok(ApiResponse::created(receipt))
}
