//! Feature Engineering
//!
//! Per-driver model inputs derived from the grid assignment and the season's
//! historical aggregates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::grid::GridAssignment;
use super::reference::{Driver, DriverTable};

/// A named model input column.
///
/// Names match the column labels the model artifacts were fitted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureColumn {
    Round,
    Abbreviation,
    GridPosition,
    Points,
    AvgQualiPosition,
    AvgRacePosition,
    QualifyingScore,
    GridImprovement,
    ConsistencyScore,
}

impl FeatureColumn {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureColumn::Round => "Round",
            FeatureColumn::Abbreviation => "Abbreviation",
            FeatureColumn::GridPosition => "GridPosition",
            FeatureColumn::Points => "Points",
            FeatureColumn::AvgQualiPosition => "AvgQualiPosition",
            FeatureColumn::AvgRacePosition => "AvgRacePosition",
            FeatureColumn::QualifyingScore => "QualifyingScore",
            FeatureColumn::GridImprovement => "GridImprovement",
            FeatureColumn::ConsistencyScore => "ConsistencyScore",
        }
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column label the feature builder cannot produce
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unknown feature column: {0}")]
pub struct UnknownColumn(pub String);

/// Feature construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("driver {0} has no grid position")]
    MissingGridPosition(String),
}

impl FromStr for FeatureColumn {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Round" => Ok(FeatureColumn::Round),
            "Abbreviation" => Ok(FeatureColumn::Abbreviation),
            "GridPosition" => Ok(FeatureColumn::GridPosition),
            "Points" => Ok(FeatureColumn::Points),
            "AvgQualiPosition" => Ok(FeatureColumn::AvgQualiPosition),
            "AvgRacePosition" => Ok(FeatureColumn::AvgRacePosition),
            "QualifyingScore" => Ok(FeatureColumn::QualifyingScore),
            "GridImprovement" => Ok(FeatureColumn::GridImprovement),
            "ConsistencyScore" => Ok(FeatureColumn::ConsistencyScore),
            other => Err(UnknownColumn(other.to_string())),
        }
    }
}

/// Complete feature set for a single driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub round: u32,
    pub driver: String,
    pub grid_position: u8,
    // Season aggregates
    pub points: f64,
    pub avg_quali_position: f64,
    pub avg_race_position: f64,
    // Derived
    pub qualifying_score: f64,
    /// Not a model input unless the column list asks for it
    pub grid_improvement: f64,
    /// Not a model input unless the column list asks for it
    pub consistency_score: f64,
}

impl FeatureVector {
    /// Numeric value of a column.
    ///
    /// `Abbreviation` is categorical; its value is the driver's label from
    /// the code table.
    pub fn value(&self, column: FeatureColumn, driver_label: u32) -> f64 {
        match column {
            FeatureColumn::Round => self.round as f64,
            FeatureColumn::Abbreviation => driver_label as f64,
            FeatureColumn::GridPosition => self.grid_position as f64,
            FeatureColumn::Points => self.points,
            FeatureColumn::AvgQualiPosition => self.avg_quali_position,
            FeatureColumn::AvgRacePosition => self.avg_race_position,
            FeatureColumn::QualifyingScore => self.qualifying_score,
            FeatureColumn::GridImprovement => self.grid_improvement,
            FeatureColumn::ConsistencyScore => self.consistency_score,
        }
    }
}

/// Feature engineering for a grid
pub struct FeatureEngineering;

impl FeatureEngineering {
    /// Features for one driver starting from `grid_position`
    pub fn create_driver_features(round: u32, driver: &Driver, grid_position: u8) -> FeatureVector {
        let grid = grid_position as f64;

        FeatureVector {
            round,
            driver: driver.code.clone(),
            grid_position,
            points: driver.points,
            avg_quali_position: driver.avg_quali_position,
            avg_race_position: driver.avg_race_position,
            qualifying_score: (driver.avg_quali_position + grid) / 2.0,
            grid_improvement: driver.avg_race_position - grid,
            consistency_score: (driver.avg_quali_position - driver.avg_race_position).abs(),
        }
    }

    /// Features for every driver in the table, in table order.
    ///
    /// Fails on the first driver without a grid position, which cannot
    /// happen for a validated assignment built from the same table.
    pub fn create_grid_features(
        round: u32,
        grid: &GridAssignment,
        drivers: &DriverTable,
    ) -> Result<Vec<FeatureVector>, FeatureError> {
        drivers
            .iter()
            .map(|driver| {
                grid.position_of(&driver.code)
                    .map(|pos| Self::create_driver_features(round, driver, pos))
                    .ok_or_else(|| FeatureError::MissingGridPosition(driver.code.clone()))
            })
            .collect()
    }
}

/// Column order of the stock model: Round, Abbreviation, GridPosition,
/// Points, AvgQualiPosition, AvgRacePosition, QualifyingScore
pub fn get_default_feature_names() -> Vec<&'static str> {
    vec![
        "Round",
        "Abbreviation",
        "GridPosition",
        "Points",
        "AvgQualiPosition",
        "AvgRacePosition",
        "QualifyingScore",
    ]
}
