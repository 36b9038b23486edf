//! Grid assignment: the starting order the user submits for a prediction

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

use super::reference::DriverTable;

/// Grid validation errors
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("all {expected} drivers must be placed before prediction, got {placed}")]
    Incomplete { placed: usize, expected: usize },

    #[error("grid position must be between 1 and {max}, got {position}")]
    PositionOutOfRange { position: u8, max: usize },

    #[error("grid position P{0} is assigned more than once")]
    DuplicatePosition(u8),

    #[error("driver {0} is placed more than once")]
    DuplicateDriver(String),

    #[error("unknown driver code: {0}")]
    UnknownDriver(String),
}

/// A single grid slot as submitted by a client.
///
/// An empty driver code means the slot was left unselected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSlot {
    pub position: u8,
    #[serde(default)]
    pub driver: String,
}

impl GridSlot {
    /// Read slots from a `position,driver` CSV. Rows with a missing driver
    /// become blank slots so validation can report them.
    pub fn load_csv<P: AsRef<Path>>(csv_path: P) -> Result<Vec<Self>, PolarsError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(csv_path.as_ref().to_path_buf()))?
            .finish()?;

        let position = df.column("position")?.cast(&DataType::Int64)?;
        let position_col = position.i64()?;
        let driver_col = df.column("driver")?.str()?;

        let slots = (0..df.height())
            .filter_map(|i| {
                let position = position_col.get(i)?;
                Some(GridSlot {
                    position: u8::try_from(position).unwrap_or(u8::MAX),
                    driver: driver_col.get(i).unwrap_or_default().to_string(),
                })
            })
            .collect();

        Ok(slots)
    }
}

/// Validated bijection between grid positions 1..=20 and the season's drivers
#[derive(Debug, Clone, PartialEq)]
pub struct GridAssignment {
    by_position: BTreeMap<u8, String>,
    by_driver: HashMap<String, u8>,
}

impl GridAssignment {
    /// Validate slots against the driver table.
    ///
    /// Blank slots are skipped; the assignment is rejected unless every
    /// driver in the table ends up on exactly one position.
    pub fn from_slots(slots: &[GridSlot], drivers: &DriverTable) -> Result<Self, GridError> {
        let max = drivers.len();
        let mut by_position = BTreeMap::new();
        let mut by_driver = HashMap::with_capacity(max);

        for slot in slots {
            let code = slot.driver.trim().to_ascii_uppercase();
            if code.is_empty() {
                continue;
            }
            if slot.position == 0 || slot.position as usize > max {
                return Err(GridError::PositionOutOfRange {
                    position: slot.position,
                    max,
                });
            }
            if !drivers.contains(&code) {
                return Err(GridError::UnknownDriver(code));
            }
            if by_position.contains_key(&slot.position) {
                return Err(GridError::DuplicatePosition(slot.position));
            }
            if by_driver.insert(code.clone(), slot.position).is_some() {
                return Err(GridError::DuplicateDriver(code));
            }
            by_position.insert(slot.position, code);
        }

        if by_driver.len() < max {
            return Err(GridError::Incomplete {
                placed: by_driver.len(),
                expected: max,
            });
        }

        Ok(Self {
            by_position,
            by_driver,
        })
    }

    /// Build from driver codes listed in grid order (P1 first)
    pub fn from_order<S: AsRef<str>>(order: &[S], drivers: &DriverTable) -> Result<Self, GridError> {
        let slots: Vec<GridSlot> = order
            .iter()
            .enumerate()
            .map(|(i, code)| GridSlot {
                position: u8::try_from(i + 1).unwrap_or(u8::MAX),
                driver: code.as_ref().to_string(),
            })
            .collect();
        Self::from_slots(&slots, drivers)
    }

    /// Grid position of a driver
    pub fn position_of(&self, code: &str) -> Option<u8> {
        self.by_driver.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reference::tests::sample_table;

    fn full_order() -> Vec<&'static str> {
        vec![
            "VER", "NOR", "HAM", "LEC", "PIA", "SAI", "RUS", "PER", "ALO", "GAS", "HUL", "TSU",
            "STR", "OCO", "MAG", "ALB", "RIC", "ZHO", "BOT", "SAR",
        ]
    }

    #[test]
    fn test_complete_grid() {
        let table = sample_table();
        let grid = GridAssignment::from_order(&full_order(), &table).unwrap();

        assert_eq!(grid.len(), 20);
        assert_eq!(grid.position_of("VER"), Some(1));
        assert_eq!(grid.position_of("SAR"), Some(20));
        assert_eq!(grid.position_of("HAM"), Some(3));
    }

    #[test]
    fn test_load_grid_csv() {
        let path = std::env::temp_dir().join(format!("f1predict_grid_{}.csv", std::process::id()));
        let mut csv = String::from("position,driver\n");
        for (i, code) in full_order().iter().enumerate() {
            csv.push_str(&format!("{},{}\n", i + 1, code));
        }
        std::fs::write(&path, csv).unwrap();

        let slots = GridSlot::load_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(slots.len(), 20);
        let grid = GridAssignment::from_slots(&slots, &sample_table()).unwrap();
        assert_eq!(grid.position_of("SAR"), Some(20));
    }

    #[test]
    fn test_lowercase_codes_accepted() {
        let table = sample_table();
        let order: Vec<String> = full_order().iter().map(|c| c.to_lowercase()).collect();
        let grid = GridAssignment::from_order(&order, &table).unwrap();
        assert_eq!(grid.position_of("NOR"), Some(2));
    }

    #[test]
    fn test_incomplete_grid_rejected() {
        let table = sample_table();
        let mut order: Vec<&str> = full_order();
        order[19] = "";

        let err = GridAssignment::from_order(&order, &table).unwrap_err();
        assert_eq!(
            err,
            GridError::Incomplete {
                placed: 19,
                expected: 20
            }
        );
    }

    #[test]
    fn test_short_grid_rejected() {
        let table = sample_table();
        let order = &full_order()[..19];
        assert!(matches!(
            GridAssignment::from_order(order, &table),
            Err(GridError::Incomplete { placed: 19, .. })
        ));
    }

    #[test]
    fn test_duplicate_driver_rejected() {
        let table = sample_table();
        let mut order = full_order();
        order[19] = "VER";
        assert_eq!(
            GridAssignment::from_order(&order, &table).unwrap_err(),
            GridError::DuplicateDriver("VER".to_string())
        );
    }

    #[test]
    fn test_duplicate_position_rejected() {
        let table = sample_table();
        let slots = vec![
            GridSlot {
                position: 1,
                driver: "VER".to_string(),
            },
            GridSlot {
                position: 1,
                driver: "NOR".to_string(),
            },
        ];
        assert_eq!(
            GridAssignment::from_slots(&slots, &table).unwrap_err(),
            GridError::DuplicatePosition(1)
        );
    }

    #[test]
    fn test_out_of_range_and_unknown() {
        let table = sample_table();
        let slots = vec![GridSlot {
            position: 21,
            driver: "VER".to_string(),
        }];
        assert!(matches!(
            GridAssignment::from_slots(&slots, &table),
            Err(GridError::PositionOutOfRange { position: 21, .. })
        ));

        let slots = vec![GridSlot {
            position: 1,
            driver: "XYZ".to_string(),
        }];
        assert_eq!(
            GridAssignment::from_slots(&slots, &table).unwrap_err(),
            GridError::UnknownDriver("XYZ".to_string())
        );
    }
}
