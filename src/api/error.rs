use crate::state::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::any::Any;
use tracing::error;

/// Error response
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// API error types
#[derive(Debug, PartialEq)]
pub enum ApiError {
    NotFound(&'static str),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::FurnaceNotFound(_) => ApiError::NotFound("Furnace not found"),
            StoreError::SensorNotFound(_) => ApiError::NotFound("Sensor not found"),
            StoreError::AlertNotFound(_) => ApiError::NotFound("Alert not found"),
            StoreError::CameraNotFound(_) => ApiError::NotFound("Camera not found"),
            StoreError::KpiNotFound(_) => ApiError::NotFound("KPI not found"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

/// Turn a handler panic into a 500 JSON envelope
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(panic = %detail, "Request handler panicked");
    ApiError::Internal("Internal server error".to_string()).into_response()
}
