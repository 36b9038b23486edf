//! Display helpers: team liveries, podium cards and the grid -> finish chart

use serde::{Deserialize, Serialize};

use crate::core::scoring::PredictionResult;
use crate::data::reference::DriverTable;

/// Colour used when a driver has no known team
pub const DEFAULT_COLOR: &str = "#FFFFFF";

/// 2024 team for each driver code
pub fn team_for_driver(code: &str) -> &'static str {
    match code {
        "VER" | "PER" => "Red Bull Racing",
        "HAM" | "RUS" => "Mercedes",
        "LEC" | "SAI" => "Ferrari",
        "NOR" | "PIA" => "McLaren",
        "ALO" | "STR" => "Aston Martin",
        "GAS" | "OCO" => "Alpine",
        "BOT" | "ZHO" => "Kick Sauber",
        "TSU" | "RIC" => "RB",
        "ALB" | "SAR" => "Williams",
        "MAG" | "HUL" => "Haas F1 Team",
        _ => "Unknown",
    }
}

/// Livery colour for a driver code
pub fn team_color(code: &str) -> &'static str {
    match code {
        "VER" | "PER" => "#3671C6",
        "HAM" | "RUS" => "#27F4D2",
        "LEC" | "SAI" => "#E8002D",
        "NOR" | "PIA" => "#FF8000",
        "ALO" | "STR" => "#229971",
        "GAS" | "OCO" => "#5E8FAA",
        "BOT" | "ZHO" => "#52E252",
        "TSU" | "RIC" => "#6692FF",
        "ALB" | "SAR" => "#64C4FF",
        "MAG" | "HUL" => "#B6BABD",
        _ => DEFAULT_COLOR,
    }
}

/// Medal label for podium places
pub fn medal(rank: u8) -> Option<&'static str> {
    match rank {
        1 => Some("gold"),
        2 => Some("silver"),
        3 => Some("bronze"),
        _ => None,
    }
}

/// Top-three card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodiumEntry {
    pub rank: u8,
    pub medal: String,
    pub driver: String,
    pub driver_name: String,
    pub team_color: String,
    pub predicted_points: u32,
}

/// One line of the grid -> predicted finish chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionChange {
    pub driver: String,
    pub driver_name: String,
    pub color: String,
    pub grid_position: u8,
    pub predicted_rank: u8,
}

pub fn build_podium(results: &[PredictionResult], drivers: &DriverTable) -> Vec<PodiumEntry> {
    results
        .iter()
        .filter_map(|r| {
            medal(r.rank).map(|m| PodiumEntry {
                rank: r.rank,
                medal: m.to_string(),
                driver: r.driver.clone(),
                driver_name: driver_name(drivers, &r.driver),
                team_color: team_color(&r.driver).to_string(),
                predicted_points: r.predicted_points,
            })
        })
        .collect()
}

pub fn build_position_chart(
    results: &[PredictionResult],
    drivers: &DriverTable,
) -> Vec<PositionChange> {
    results
        .iter()
        .map(|r| PositionChange {
            driver: r.driver.clone(),
            driver_name: driver_name(drivers, &r.driver),
            color: team_color(&r.driver).to_string(),
            grid_position: r.grid_position,
            predicted_rank: r.rank,
        })
        .collect()
}

fn driver_name(drivers: &DriverTable, code: &str) -> String {
    drivers
        .get(code)
        .map(|d| d.name.clone())
        .unwrap_or_else(|| code.to_string())
}
