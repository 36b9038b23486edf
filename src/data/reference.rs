//! Season reference table: per-driver historical aggregates loaded from CSV

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::presentation::team_for_driver;

/// Number of drivers on a full grid
pub const GRID_SIZE: usize = 20;

/// Reference table errors
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to read driver table: {0}")]
    Csv(#[from] PolarsError),

    #[error("driver table must hold exactly {expected} drivers, found {actual}")]
    WrongDriverCount { expected: usize, actual: usize },

    #[error("driver {0} appears more than once in the driver table")]
    DuplicateDriver(String),

    #[error("driver table row {row} has no abbreviation")]
    MissingAbbreviation { row: usize },

    #[error("driver table row {row} has no usable {column} value")]
    MissingValue { row: usize, column: &'static str },
}

/// One driver's season aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub code: String,
    pub name: String,
    pub team: String,
    pub points: f64,
    pub avg_quali_position: f64,
    pub avg_race_position: f64,
}

/// Immutable driver table for one season, in file order
#[derive(Debug, Clone)]
pub struct DriverTable {
    drivers: Vec<Driver>,
    index: HashMap<String, usize>,
}

impl DriverTable {
    /// Load the table from a CSV with columns
    /// `Abbreviation, DriverName, Points, AvgQualiPosition, AvgRacePosition[, TeamName]`
    pub fn load<P: AsRef<Path>>(csv_path: P) -> Result<Self, ReferenceError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(csv_path.as_ref().to_path_buf()))?
            .finish()?;

        let drivers = Self::dataframe_to_drivers(&df)?;
        let table = Self::from_drivers(drivers)?;

        info!(
            "Loaded {} drivers from {:?}",
            table.len(),
            csv_path.as_ref()
        );
        Ok(table)
    }

    /// Build a table from already-parsed rows
    pub fn from_drivers(drivers: Vec<Driver>) -> Result<Self, ReferenceError> {
        if drivers.len() != GRID_SIZE {
            return Err(ReferenceError::WrongDriverCount {
                expected: GRID_SIZE,
                actual: drivers.len(),
            });
        }

        let mut index = HashMap::with_capacity(drivers.len());
        for (i, driver) in drivers.iter().enumerate() {
            if index.insert(driver.code.clone(), i).is_some() {
                return Err(ReferenceError::DuplicateDriver(driver.code.clone()));
            }
        }

        Ok(Self { drivers, index })
    }

    /// Look up a driver by code
    pub fn get(&self, code: &str) -> Option<&Driver> {
        self.index.get(code).map(|&i| &self.drivers[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Drivers in file order
    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    /// Driver codes in file order
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.drivers.iter().map(|d| d.code.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Driver> {
        self.drivers.iter()
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    fn dataframe_to_drivers(df: &DataFrame) -> Result<Vec<Driver>, ReferenceError> {
        // Integer-valued columns are inferred as i64, so cast everything numeric up front
        let code_col = df.column("Abbreviation")?.str()?;
        let name_col = df.column("DriverName")?.str()?;
        let points = df.column("Points")?.cast(&DataType::Float64)?;
        let points_col = points.f64()?;
        let quali = df.column("AvgQualiPosition")?.cast(&DataType::Float64)?;
        let quali_col = quali.f64()?;
        let race = df.column("AvgRacePosition")?.cast(&DataType::Float64)?;
        let race_col = race.f64()?;
        let team_col = df.column("TeamName").ok().and_then(|c| c.str().ok());

        let mut drivers = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let code = code_col
                .get(i)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or(ReferenceError::MissingAbbreviation { row: i + 1 })?;

            let team = team_col
                .and_then(|c| c.get(i))
                .map(str::to_string)
                .unwrap_or_else(|| team_for_driver(&code).to_string());

            drivers.push(Driver {
                name: name_col.get(i).unwrap_or("").to_string(),
                team,
                points: required_value(points_col, i, "Points")?,
                avg_quali_position: required_value(quali_col, i, "AvgQualiPosition")?,
                avg_race_position: required_value(race_col, i, "AvgRacePosition")?,
                code,
            });
        }

        Ok(drivers)
    }
}

/// Blank and NaN cells cannot be fed to the scaler
fn required_value(
    column: &Float64Chunked,
    i: usize,
    name: &'static str,
) -> Result<f64, ReferenceError> {
    column
        .get(i)
        .filter(|v| v.is_finite())
        .ok_or(ReferenceError::MissingValue {
            row: i + 1,
            column: name,
        })
}
