//! Result ranking and scoring
//!
//! Turns raw model outputs into a finishing order with championship points
//! and a display confidence.
//!
//! Confidence is a heuristic, not a calibrated probability:
//!     confidence = clamp(round(100 - 3 * |predicted - grid|), 50, 100)

use serde::{Deserialize, Serialize};

/// Championship points for finishing positions 1-10
pub const POINTS_TABLE: [u32; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];

const CONFIDENCE_MAX: f64 = 100.0;
const CONFIDENCE_MIN: f64 = 50.0;
const CONFIDENCE_PENALTY_PER_PLACE: f64 = 3.0;

/// Model output for one driver, before ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    pub driver: String,
    pub predicted_position: f64,
    pub grid_position: u8,
}

/// Ranked prediction for one driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub rank: u8,
    pub driver: String,
    pub predicted_position: f64,
    pub grid_position: u8,
    pub predicted_points: u32,
    pub confidence: f64,
}

impl PredictionResult {
    /// Places gained from the grid (negative when places are lost)
    pub fn positions_gained(&self) -> i32 {
        self.grid_position as i32 - self.rank as i32
    }
}

/// Points awarded for a 1-based finishing position
///
/// # Examples
/// ```
/// use f1predict::core::scoring::points_for_rank;
/// assert_eq!(points_for_rank(1), 25);
/// assert_eq!(points_for_rank(10), 1);
/// assert_eq!(points_for_rank(11), 0);
/// ```
pub fn points_for_rank(rank: usize) -> u32 {
    match rank {
        1..=10 => POINTS_TABLE[rank - 1],
        _ => 0,
    }
}

/// Display confidence for a prediction
pub fn calculate_confidence(predicted_position: f64, grid_position: u8) -> f64 {
    let raw = CONFIDENCE_MAX
        - CONFIDENCE_PENALTY_PER_PLACE * (predicted_position - grid_position as f64).abs();
    raw.round().clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
}

/// Sort by predicted position and assign rank, points and confidence.
///
/// The sort is stable, so equal predictions keep their input order.
pub fn rank_predictions(predictions: Vec<RawPrediction>) -> Vec<PredictionResult> {
    let mut predictions = predictions;
    predictions.sort_by(|a, b| a.predicted_position.total_cmp(&b.predicted_position));

    predictions
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let rank = i + 1;
            PredictionResult {
                rank: u8::try_from(rank).unwrap_or(u8::MAX),
                confidence: calculate_confidence(p.predicted_position, p.grid_position),
                predicted_points: points_for_rank(rank),
                driver: p.driver,
                predicted_position: p.predicted_position,
                grid_position: p.grid_position,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(driver: &str, predicted: f64, grid: u8) -> RawPrediction {
        RawPrediction {
            driver: driver.to_string(),
            predicted_position: predicted,
            grid_position: grid,
        }
    }

    fn twenty_predictions() -> Vec<RawPrediction> {
        // Reverse-ish predictions so sorting actually moves rows
        (1..=20u8)
            .map(|g| raw(&format!("D{:02}", g), 21.0 - g as f64 * 0.9, g))
            .collect()
    }

    #[test]
    fn test_points_table() {
        let expected = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];
        for (i, &pts) in expected.iter().enumerate() {
            assert_eq!(points_for_rank(i + 1), pts);
        }
        for rank in 11..=20 {
            assert_eq!(points_for_rank(rank), 0);
        }
        assert_eq!(points_for_rank(0), 0);
    }

    #[test]
    fn test_confidence_formula() {
        assert_eq!(calculate_confidence(1.0, 1), 100.0);
        assert_eq!(calculate_confidence(3.0, 1), 94.0);
        assert_eq!(calculate_confidence(1.4, 2), 98.0); // 98.2 rounds down
        assert_eq!(calculate_confidence(2.5, 1), 96.0); // 95.5 rounds up
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(calculate_confidence(20.0, 1), 50.0);
        assert_eq!(calculate_confidence(-5.0, 20), 50.0);
        for grid in 1..=20u8 {
            for tenth in 0..=250 {
                let c = calculate_confidence(tenth as f64 / 10.0, grid);
                assert!((50.0..=100.0).contains(&c));
            }
        }
    }

    #[test]
    fn test_ranks_are_permutation() {
        let results = rank_predictions(twenty_predictions());
        let ranks: Vec<u8> = results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, (1..=20).collect::<Vec<u8>>());

        for w in results.windows(2) {
            assert!(w[0].predicted_position <= w[1].predicted_position);
        }
        assert_eq!(results[0].driver, "D20");
        assert_eq!(results[0].predicted_points, 25);
        assert_eq!(results[10].predicted_points, 0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let results = rank_predictions(vec![
            raw("B", 2.0, 1),
            raw("A", 1.0, 2),
            raw("C", 2.0, 3),
            raw("D", 2.0, 4),
        ]);
        let order: Vec<&str> = results.iter().map(|r| r.driver.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_positions_gained() {
        let results = rank_predictions(vec![raw("A", 1.2, 5), raw("B", 3.0, 1)]);
        assert_eq!(results[0].positions_gained(), 4);
        assert_eq!(results[1].positions_gained(), -1);
    }
}
