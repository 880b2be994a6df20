//! API route handlers

pub mod wallet;

use crate::api::server::AppState;
use crate::error::ErrorKind;
use axum::{http::StatusCode, Json};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Absent for transport-level failures (auth, missing headers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error(status: StatusCode, message: impl Into<String>, kind: Option<ErrorKind>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            kind,
        }),
    )
}

/// Check the bearer token against the configured API token
pub(crate) fn authorize(
    state: &AppState,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<(), ApiError> {
    match auth {
        Some(TypedHeader(auth)) if auth.token() == &*state.api_token => Ok(()),
        Some(_) => Err(error(StatusCode::UNAUTHORIZED, "Invalid API token", None)),
        None => Err(error(StatusCode::UNAUTHORIZED, "API token required", None)),
    }
}
