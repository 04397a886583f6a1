use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::{decode_token, Claims};
use crate::error::ApiError;
use crate::AppState;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Decode a Bearer token if one is present and stash the user in the request.
///
/// Never rejects: a missing or bad token just leaves the request anonymous,
/// and the guards below decide what anonymous callers may reach.
pub async fn authenticate_jwt(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match extract_jwt_from_headers(request.headers()) {
        Ok(token) => match decode_token(&token, &state.config.security) {
            Ok(claims) => {
                request.extensions_mut().insert(AuthUser::from(claims));
            }
            Err(e) => debug!("Ignoring token: {}", e),
        },
        Err(msg) => debug!("No usable token: {}", msg),
    }

    next.run(request).await
}

/// Reject anonymous requests.
pub async fn ensure_logged_in(request: Request, next: Next) -> Result<Response, ApiError> {
    if request.extensions().get::<AuthUser>().is_none() {
        return Err(ApiError::unauthorized("Authentication required"));
    }
    Ok(next.run(request).await)
}

/// Reject anyone who is not an admin.
pub async fn ensure_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    match request.extensions().get::<AuthUser>() {
        Some(user) if user.is_admin => Ok(next.run(request).await),
        _ => Err(ApiError::unauthorized("Admin access required")),
    }
}

/// The caller must be `username` or an admin.
pub fn ensure_correct_user_or_admin(user: &AuthUser, username: &str) -> Result<(), ApiError> {
    if user.is_admin || user.username == username {
        Ok(())
    } else {
        Err(ApiError::unauthorized("Not permitted for this user"))
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
