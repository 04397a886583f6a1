// handlers/mod.rs - HTTP handlers grouped by the access they require
//
// public    - no token needed (token acquisition, browsing companies and jobs)
// protected - any logged-in user; per-user routes also check ownership
// elevated  - admin only

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};
use std::collections::HashMap;

use crate::error::ApiError;

pub mod elevated;
pub mod protected;
pub mod public;

/// Unwrap a JSON body, turning axum's rejection into a 400.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))
}

/// Unwrap query parameters, turning axum's rejection into a 400.
pub(crate) fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Map a model's field checks onto a validation error.
pub(crate) fn validated(result: Result<(), HashMap<String, String>>) -> Result<(), ApiError> {
    result.map_err(ApiError::invalid_fields)
}
