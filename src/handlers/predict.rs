use actix_web::{web, HttpResponse};
use std::sync::Arc;
use tracing::info;

use crate::AppState;
use f1predict::data::GridAssignment;
use f1predict::error::{resolve_event, AppError};
use f1predict::models::PredictRequest;

/// Predict the finishing order for a race from its starting grid
pub async fn predict_race(
    state: web::Data<Arc<AppState>>,
    req: web::Json<PredictRequest>,
) -> Result<HttpResponse, AppError> {
    let event = resolve_event(&state.schedule, req.round, req.event.as_deref())?;
    let grid = GridAssignment::from_slots(&req.grid, &state.drivers)?;
    info!("Predicting {} with {} grid slots", event.name, grid.len());

    let response = {
        let mut predictor = state
            .predictor
            .lock()
            .map_err(|_| AppError::InternalError("predictor lock poisoned".to_string()))?;
        predictor.predict_race(&state.drivers, state.schedule.season(), event, &grid)?
    };

    Ok(HttpResponse::Ok().json(response))
}
