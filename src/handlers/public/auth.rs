// handlers/public/auth.rs - POST /auth/token, POST /auth/register

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::{create_token, Claims};
use crate::database::models::{NewUser, User};
use crate::handlers::{json_body, validated};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

fn issue_token(state: &AppState, user: &User) -> Result<TokenResponse, crate::error::ApiError> {
    let claims = Claims::new(&user.username, user.is_admin, &state.config.security);
    let token = create_token(&claims, &state.config.security)?;
    Ok(TokenResponse { token })
}

/// POST /auth/token - exchange credentials for a JWT
pub async fn token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let request = json_body(payload)?;

    let mut conn = state.db.pool().acquire().await?;
    let user = UserService::new(&state.config.security)
        .authenticate(&mut conn, &request.username, &request.password)
        .await?;

    Ok(ApiResponse::success(issue_token(&state, &user)?))
}

/// POST /auth/register - self sign-up; never grants admin
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let mut data = json_body(payload)?;
    validated(data.validate())?;
    data.is_admin = false;

    let mut tx = state.db.begin().await?;
    let user = UserService::new(&state.config.security).register(&mut tx, &data).await?;
    tx.commit().await?;

    info!(username = %user.username, "Self-registered user");
    Ok(ApiResponse::created(issue_token(&state, &user)?))
}
