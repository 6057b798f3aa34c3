use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::core::lineup::LineupError;
use crate::models::ErrorResponse;
use crate::predictor::PredictionError;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Invalid lineup or unknown player
    ValidationError(String),
    /// Prediction adapter failure
    PredictionError(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<LineupError> for AppError {
    fn from(err: LineupError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        AppError::PredictionError(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            // Adapter failures are service-level, distinct from bad requests.
            AppError::PredictionError(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            AppError::ValidationError(msg) => ("validation_error", msg.clone()),
            AppError::PredictionError(msg) => ("prediction_error", msg.clone()),
            AppError::InternalError(msg) => ("internal_error", msg.clone()),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error_code.to_string(),
            message,
        })
    }
}
