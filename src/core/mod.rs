//! Core business logic modules

pub mod encoder;
pub mod scaler;
pub mod scoring;
pub mod stats;

// Re-export commonly used types
pub use encoder::DriverEncoder;
pub use scaler::StandardScaler;
pub use scoring::{
    calculate_confidence, points_for_rank, rank_predictions, PredictionResult, RawPrediction,
};
pub use stats::{calculate_statistics, PositionMove, RaceStatistics};
