use serde::{Deserialize, Serialize};

use crate::core::stats::RaceStatistics;
use crate::data::grid::GridSlot;
use crate::data::schedule::Event;
use crate::presentation::{PodiumEntry, PositionChange};

/// Race prediction request
///
/// The race is picked by `round` or by `event` name; `round` wins if both are set.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub event: Option<String>,
    pub grid: Vec<GridSlot>,
}

/// One row of the predicted classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRow {
    pub rank: u8,
    pub driver: String,
    pub driver_name: String,
    pub team: String,
    pub team_color: String,
    pub grid_position: u8,
    pub predicted_position: f64,
    pub predicted_points: u32,
    pub confidence: f64,
    pub positions_gained: i32,
}

/// Race prediction response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub season: i32,
    pub round: u32,
    pub event_name: String,
    pub results: Vec<PredictionRow>,
    pub podium: Vec<PodiumEntry>,
    pub position_changes: Vec<PositionChange>,
    pub statistics: RaceStatistics,
}

/// Season schedule response
#[derive(Debug, Serialize, Deserialize)]
pub struct EventsResponse {
    pub season: i32,
    pub events: Vec<Event>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub drivers: usize,
    pub events: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
