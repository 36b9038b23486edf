use crate::core::scoring::{rank_predictions, PredictionResult, RawPrediction};
use crate::core::stats::calculate_statistics;
use crate::core::{DriverEncoder, StandardScaler};
use crate::data::features::{
    FeatureColumn, FeatureEngineering, FeatureError, FeatureVector, UnknownColumn,
};
use crate::data::grid::GridAssignment;
use crate::data::reference::DriverTable;
use crate::data::schedule::Event;
use crate::models::{PredictResponse, PredictionRow};
use crate::presentation::{build_podium, build_position_chart, team_color};
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Ordered list of column labels the scaler and model were fitted on
pub const FEATURE_COLUMNS_FILE: &str = "feature_columns.json";
/// Per-column mean and scale
pub const SCALER_FILE: &str = "scaler.json";
/// Fixed driver code table (optional)
pub const DRIVER_CODES_FILE: &str = "driver_codes.json";
/// Regressor exported to ONNX
pub const ONNX_MODEL_FILE: &str = "f1_race_predictor.onnx";
/// Linear regressor over scaled columns, used when no ONNX export exists
pub const LINEAR_MODEL_FILE: &str = "f1_race_predictor.json";

/// Errors raised while loading model artifacts. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    UnknownColumn(#[from] UnknownColumn),

    #[error("feature column list is empty")]
    NoColumns,

    #[error("scaler was fitted on {scaler} columns but the feature list has {columns}")]
    ScalerShape { scaler: usize, columns: usize },

    #[error("linear model has {coefficients} coefficients but the feature list has {columns}")]
    ModelShape { coefficients: usize, columns: usize },

    #[error("driver {0} has no entry in the driver code table")]
    UnencodedDriver(String),

    #[error("no model in {0:?}: expected f1_race_predictor.onnx or f1_race_predictor.json")]
    MissingModel(PathBuf),

    #[error("ONNX Runtime error: {0}")]
    Onnx(#[from] ort::Error),
}

/// Errors raised while predicting a single race
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Features(#[from] FeatureError),

    #[error("driver {0} has no code in the driver encoder")]
    UnencodedDriver(String),

    #[error("model returned {actual} predictions for {expected} drivers")]
    OutputLength { expected: usize, actual: usize },

    #[error("model returned a non-finite prediction for {driver}: {value}")]
    NonFinitePrediction { driver: String, value: f64 },

    #[error("inference failed: {0}")]
    Inference(String),
}

/// A pre-trained model mapping scaled feature rows to a finishing position
pub trait Regressor: Send {
    /// Predict one value per row of a row-major `rows × cols` matrix
    fn predict(&mut self, matrix: &[f64], rows: usize, cols: usize)
        -> Result<Vec<f64>, PredictError>;

    /// Short description for logs and health checks
    fn describe(&self) -> String;
}

/// ONNX Runtime regressor
pub struct OnnxRegressor {
    session: Session,
    input_name: String,
    path: PathBuf,
}

impl OnnxRegressor {
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self, ArtifactError> {
        let path = model_path.as_ref().to_path_buf();
        info!("Loading ONNX model: {:?}", path);

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&path)?;

        // Exporters name the input differently ("input", "float_input", ...)
        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input".to_string());

        Ok(Self {
            session,
            input_name,
            path,
        })
    }
}

impl Regressor for OnnxRegressor {
    fn predict(
        &mut self,
        matrix: &[f64],
        rows: usize,
        cols: usize,
    ) -> Result<Vec<f64>, PredictError> {
        let input_vec: Vec<f32> = matrix.iter().map(|&x| x as f32).collect();
        let input_tensor = Tensor::from_array(([rows, cols], input_vec))
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        // Regressors export either [N] or [N, 1]; both flatten to N values
        let (_, output_data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        Ok(output_data.iter().map(|&v| v as f64).collect())
    }

    fn describe(&self) -> String {
        format!("onnx:{}", self.path.display())
    }
}

/// Linear model `intercept + Σ coefficients[i] * x[i]` over scaled columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegressor {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
        }
    }
}

impl Regressor for LinearRegressor {
    fn predict(
        &mut self,
        matrix: &[f64],
        rows: usize,
        cols: usize,
    ) -> Result<Vec<f64>, PredictError> {
        if cols != self.coefficients.len() || matrix.len() != rows * cols {
            return Err(PredictError::Inference(format!(
                "expected {} columns, got {} values for {} rows",
                self.coefficients.len(),
                matrix.len(),
                rows
            )));
        }

        Ok(matrix
            .chunks(cols)
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(x, w)| x * w)
                        .sum::<f64>()
            })
            .collect())
    }

    fn describe(&self) -> String {
        format!("linear:{} coefficients", self.coefficients.len())
    }
}

/// Inference adapter: encodes drivers, orders and scales columns, runs the model
pub struct Predictor {
    columns: Vec<FeatureColumn>,
    scaler: StandardScaler,
    encoder: DriverEncoder,
    model: Box<dyn Regressor>,
}

impl Predictor {
    /// Assemble a predictor, checking that the pieces agree on shape
    pub fn new(
        columns: Vec<FeatureColumn>,
        scaler: StandardScaler,
        encoder: DriverEncoder,
        model: Box<dyn Regressor>,
    ) -> Result<Self, ArtifactError> {
        if columns.is_empty() {
            return Err(ArtifactError::NoColumns);
        }
        if scaler.n_features() != columns.len() {
            return Err(ArtifactError::ScalerShape {
                scaler: scaler.n_features(),
                columns: columns.len(),
            });
        }

        Ok(Self {
            columns,
            scaler,
            encoder,
            model,
        })
    }

    /// Load artifacts from a model directory.
    ///
    /// Every driver in `drivers` must be encodable, so a stale code table is
    /// caught here rather than on the first request.
    pub fn load<P: AsRef<Path>>(model_dir: P, drivers: &DriverTable) -> Result<Self, ArtifactError> {
        let model_dir = model_dir.as_ref();
        info!("Loading model artifacts from {:?}", model_dir);

        let names: Vec<String> = read_json(&model_dir.join(FEATURE_COLUMNS_FILE))?;
        let columns = names
            .iter()
            .map(|n| n.parse::<FeatureColumn>())
            .collect::<Result<Vec<_>, _>>()?;
        info!("Feature columns: {:?}", names);

        let scaler: StandardScaler = read_json(&model_dir.join(SCALER_FILE))?;

        let codes_path = model_dir.join(DRIVER_CODES_FILE);
        let encoder = if codes_path.exists() {
            read_json::<DriverEncoder>(&codes_path)?
        } else {
            warn!(
                "{:?} not found; deriving driver codes from the driver table",
                codes_path
            );
            DriverEncoder::fit(drivers.codes())
        };
        if let Some(missing) = drivers.codes().find(|c| !encoder.contains(c)) {
            return Err(ArtifactError::UnencodedDriver(missing.to_string()));
        }

        let onnx_path = model_dir.join(ONNX_MODEL_FILE);
        let linear_path = model_dir.join(LINEAR_MODEL_FILE);
        let model: Box<dyn Regressor> = if onnx_path.exists() {
            Box::new(OnnxRegressor::load(&onnx_path)?)
        } else if linear_path.exists() {
            let linear: LinearRegressor = read_json(&linear_path)?;
            if linear.coefficients.len() != columns.len() {
                return Err(ArtifactError::ModelShape {
                    coefficients: linear.coefficients.len(),
                    columns: columns.len(),
                });
            }
            Box::new(linear)
        } else {
            return Err(ArtifactError::MissingModel(model_dir.to_path_buf()));
        };

        let predictor = Self::new(columns, scaler, encoder, model)?;
        info!("Model ready: {}", predictor.describe());
        Ok(predictor)
    }

    pub fn describe(&self) -> String {
        self.model.describe()
    }

    /// Predicted finishing position for each feature vector, in input order
    pub fn predict(&mut self, features: &[FeatureVector]) -> Result<Vec<f64>, PredictError> {
        let mut matrix = self.feature_matrix(features)?;
        self.scaler.transform(&mut matrix);

        let predictions = self
            .model
            .predict(&matrix, features.len(), self.columns.len())?;

        if predictions.len() != features.len() {
            return Err(PredictError::OutputLength {
                expected: features.len(),
                actual: predictions.len(),
            });
        }
        if let Some((f, &value)) = features
            .iter()
            .zip(&predictions)
            .find(|(_, p)| !p.is_finite())
        {
            return Err(PredictError::NonFinitePrediction {
                driver: f.driver.clone(),
                value,
            });
        }
        Ok(predictions)
    }

    /// Predict and rank a complete grid
    pub fn predict_grid(
        &mut self,
        drivers: &DriverTable,
        round: u32,
        grid: &GridAssignment,
    ) -> Result<Vec<PredictionResult>, PredictError> {
        let features = FeatureEngineering::create_grid_features(round, grid, drivers)?;

        let predicted = self.predict(&features)?;
        debug!(
            "round {} predictions: {:?}",
            round,
            features
                .iter()
                .zip(&predicted)
                .map(|(f, p)| format!("{}={:.3}", f.driver, p))
                .collect::<Vec<_>>()
        );

        let raw = features
            .into_iter()
            .zip(predicted)
            .map(|(f, predicted_position)| RawPrediction {
                driver: f.driver,
                predicted_position,
                grid_position: f.grid_position,
            })
            .collect();

        Ok(rank_predictions(raw))
    }

    /// Full race prediction with podium, chart and statistics
    pub fn predict_race(
        &mut self,
        drivers: &DriverTable,
        season: i32,
        event: &Event,
        grid: &GridAssignment,
    ) -> Result<PredictResponse, PredictError> {
        let results = self.predict_grid(drivers, event.round, grid)?;
        info!(
            "Predicted {} (round {}): winner {}",
            event.name,
            event.round,
            results.first().map(|r| r.driver.as_str()).unwrap_or("-")
        );

        let rows = results
            .iter()
            .map(|r| {
                let driver = drivers.get(&r.driver);
                PredictionRow {
                    rank: r.rank,
                    driver: r.driver.clone(),
                    driver_name: driver.map(|d| d.name.clone()).unwrap_or_default(),
                    team: driver.map(|d| d.team.clone()).unwrap_or_default(),
                    team_color: team_color(&r.driver).to_string(),
                    grid_position: r.grid_position,
                    predicted_position: r.predicted_position,
                    predicted_points: r.predicted_points,
                    confidence: r.confidence,
                    positions_gained: r.positions_gained(),
                }
            })
            .collect();

        Ok(PredictResponse {
            season,
            round: event.round,
            event_name: event.name.clone(),
            podium: build_podium(&results, drivers),
            position_changes: build_position_chart(&results, drivers),
            statistics: calculate_statistics(&results),
            results: rows,
        })
    }

    /// Row-major matrix in artifact column order
    fn feature_matrix(&self, features: &[FeatureVector]) -> Result<Vec<f64>, PredictError> {
        let mut matrix = Vec::with_capacity(features.len() * self.columns.len());

        for f in features {
            let label = self
                .encoder
                .encode(&f.driver)
                .ok_or_else(|| PredictError::UnencodedDriver(f.driver.clone()))?;
            matrix.extend(self.columns.iter().map(|&column| f.value(column, label)));
        }

        Ok(matrix)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}
