//! Error mapping for HTTP handlers

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::error::InvalidPattern;

/// Errors returned by the session endpoints
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid breathing pattern: {0}")]
    InvalidPattern(#[from] InvalidPattern),

    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("Malformed request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Request must name a preset or include a pattern")]
    MissingPattern,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPattern(_) | ApiError::InvalidBody(_) | ApiError::MissingPattern => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UnknownPreset(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}
