use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::AppState;
use f1predict::models::HealthResponse;

/// Health check endpoint
pub async fn health_check(state: web::Data<Arc<AppState>>) -> impl Responder {
    let model = match state.predictor.lock() {
        Ok(predictor) => predictor.describe(),
        Err(_) => "unavailable".to_string(),
    };

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model,
        drivers: state.drivers.len(),
        events: state.schedule.len(),
    };

    HttpResponse::Ok().json(response)
}
