//! F1 Predict - race finishing order prediction
//!
//! This library provides:
//! - Season driver and schedule loading
//! - Starting grid validation
//! - Finishing position regression using ONNX (or linear) models
//! - Ranking, championship points and confidence scoring
//! - Podium and grid -> finish chart helpers
//!
//! # Example
//!
//! ```no_run
//! use f1predict::data::{DriverTable, GridAssignment, Schedule};
//! use f1predict::predictor::Predictor;
//!
//! # fn main() -> anyhow::Result<()> {
//! let drivers = DriverTable::load("model/DATA/filtered_drivers_info.csv")?;
//! let schedule = Schedule::load("model/DATA/schedule.csv", 2024)?;
//! let mut predictor = Predictor::load("model", &drivers)?;
//!
//! let order: Vec<&str> = drivers.codes().collect();
//! let grid = GridAssignment::from_order(&order, &drivers)?;
//! let event = schedule.by_name("Monaco Grand Prix").expect("known event");
//!
//! let response = predictor.predict_race(&drivers, schedule.season(), event, &grid)?;
//! println!("Winner: {}", response.results[0].driver);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod data;
pub mod models;
pub mod predictor;
pub mod presentation;

// API-specific modules (only available with api feature)
#[cfg(feature = "api")]
pub mod error;

// Re-export commonly used types
pub use config::AppConfig;
pub use data::{DriverTable, Event, GridAssignment, GridSlot, Schedule};
pub use models::{PredictRequest, PredictResponse, PredictionRow};
pub use predictor::{ArtifactError, PredictError, Predictor};
