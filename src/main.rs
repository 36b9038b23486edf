use actix_web::{middleware, web, App, HttpServer};
use std::sync::{Arc, Mutex};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod handlers;

use f1predict::config::AppConfig;
use f1predict::data::{DriverTable, Schedule};
use f1predict::predictor::Predictor;
use handlers::{events, health, predict};

/// Application state shared across handlers
pub struct AppState {
    pub predictor: Mutex<Predictor>,
    pub drivers: DriverTable,
    pub schedule: Schedule,
}

fn load_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let drivers = DriverTable::load(&config.drivers_csv)?;
    let schedule = Schedule::load(&config.schedule_csv, config.season)?;
    let predictor = Predictor::load(&config.model_dir, &drivers)?;

    Ok(AppState {
        predictor: Mutex::new(predictor),
        drivers,
        schedule,
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::from_env();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    info!("Loading season {} data and model from {:?}", config.season, config.model_dir);

    // Artifacts must agree before any request is served
    let app_state = match load_state(&config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Startup failed: {:#}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    let addr = config.bind_addr();
    info!("Starting F1 prediction server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(health::health_check))
            .route("/events", web::get().to(events::list_events))
            .route("/drivers", web::get().to(events::list_drivers))
            .route("/predict", web::post().to(predict::predict_race))
    })
    .bind(&addr)?
    .run()
    .await
}
