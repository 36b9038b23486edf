use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::data::grid::GridError;
use crate::data::schedule::{Event, Schedule};
use crate::models::ErrorResponse;
use crate::predictor::PredictError;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Invalid request data
    ValidationError(String),
    /// Model or prediction error
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

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::PredictionError(_) => StatusCode::INTERNAL_SERVER_ERROR,
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

impl From<GridError> for AppError {
    fn from(err: GridError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        AppError::PredictionError(err.to_string())
    }
}

/// Resolve the requested race, preferring an explicit round number
pub fn resolve_event<'a>(
    schedule: &'a Schedule,
    round: Option<u32>,
    event: Option<&str>,
) -> Result<&'a Event, AppError> {
    match (round, event) {
        (Some(round), _) => schedule.by_round(round).ok_or_else(|| {
            AppError::ValidationError(format!(
                "No event with round {} in season {}",
                round,
                schedule.season()
            ))
        }),
        (None, Some(name)) => schedule
            .by_name(name)
            .ok_or_else(|| AppError::ValidationError(format!("Unknown event: {}", name))),
        (None, None) => Err(AppError::ValidationError(
            "Either round or event is required".to_string(),
        )),
    }
}
