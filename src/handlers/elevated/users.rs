// handlers/elevated/users.rs - admin user management

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use serde::Serialize;

use crate::auth::{create_token, Claims};
use crate::database::models::{NewUser, User, UserDetail};
use crate::handlers::{json_body, validated};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub user: User,
    pub token: String,
}

/// POST /users - create any user, admins included; returns a token for them
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<CreatedUser> {
    let data = json_body(payload)?;
    validated(data.validate())?;

    let mut tx = state.db.begin().await?;
    let user = UserService::new(&state.config.security).register(&mut tx, &data).await?;
    tx.commit().await?;

    let claims = Claims::new(&user.username, user.is_admin, &state.config.security);
    let token = create_token(&claims, &state.config.security)?;
    Ok(ApiResponse::created(CreatedUser { user, token }))
}

/// GET /users
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UserDetail>> {
    let mut conn = state.db.pool().acquire().await?;
    let users = UserService::find_all(&mut conn).await?;
    Ok(ApiResponse::success(users))
}
