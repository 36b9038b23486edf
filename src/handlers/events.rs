use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::AppState;
use f1predict::data::Driver;
use f1predict::models::EventsResponse;

/// Season schedule, round 1 onwards
pub async fn list_events(state: web::Data<Arc<AppState>>) -> impl Responder {
    HttpResponse::Ok().json(EventsResponse {
        season: state.schedule.season(),
        events: state.schedule.events().to_vec(),
    })
}

/// Drivers available for grid slots
pub async fn list_drivers(state: web::Data<Arc<AppState>>) -> impl Responder {
    let drivers: &[Driver] = state.drivers.drivers();
    HttpResponse::Ok().json(drivers)
}
