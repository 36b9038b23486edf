//! Data loading and feature engineering modules

pub mod features;
pub mod grid;
pub mod reference;
pub mod schedule;

// Re-export commonly used types
pub use features::{
    get_default_feature_names, FeatureColumn, FeatureEngineering, FeatureError, FeatureVector,
};
pub use grid::{GridAssignment, GridError, GridSlot};
pub use reference::{Driver, DriverTable, ReferenceError, GRID_SIZE};
pub use schedule::{Event, Schedule};
