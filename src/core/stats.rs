//! Race summary statistics over a ranked prediction

use serde::{Deserialize, Serialize};

use super::scoring::PredictionResult;

/// A driver's movement between grid and predicted finish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionMove {
    pub driver: String,
    pub grid_position: u8,
    pub rank: u8,
    /// Absolute number of places moved
    pub places: u32,
}

/// Summary shown under the results table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceStatistics {
    pub biggest_gainer: Option<PositionMove>,
    pub biggest_loser: Option<PositionMove>,
    /// Mean confidence, one decimal
    pub avg_confidence: f64,
    pub total_drivers: usize,
}

/// Calculate statistics from ranked results.
///
/// On ties the driver ranked higher wins both the gainer and loser slots.
pub fn calculate_statistics(results: &[PredictionResult]) -> RaceStatistics {
    if results.is_empty() {
        return RaceStatistics {
            biggest_gainer: None,
            biggest_loser: None,
            avg_confidence: 0.0,
            total_drivers: 0,
        };
    }

    let mut gainer = &results[0];
    let mut loser = &results[0];
    for r in &results[1..] {
        if r.positions_gained() > gainer.positions_gained() {
            gainer = r;
        }
        if r.positions_gained() < loser.positions_gained() {
            loser = r;
        }
    }

    let avg_confidence =
        results.iter().map(|r| r.confidence).sum::<f64>() / results.len() as f64;

    RaceStatistics {
        biggest_gainer: Some(to_move(gainer)),
        biggest_loser: Some(to_move(loser)),
        avg_confidence: (avg_confidence * 10.0).round() / 10.0,
        total_drivers: results.len(),
    }
}

fn to_move(r: &PredictionResult) -> PositionMove {
    PositionMove {
        driver: r.driver.clone(),
        grid_position: r.grid_position,
        rank: r.rank,
        places: r.positions_gained().unsigned_abs(),
    }
}
