//! Standard scaling with a pre-fitted mean/scale per column

use serde::{Deserialize, Serialize};

/// Pre-fitted standard scaler.
///
/// `transform` computes `(x - mean) / scale` column by column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Identity scaler for `n` columns
    pub fn identity(n: usize) -> Self {
        Self {
            mean: vec![0.0; n],
            scale: vec![1.0; n],
        }
    }

    /// Number of columns the scaler was fitted on (0 if mean and scale disagree)
    pub fn n_features(&self) -> usize {
        if self.mean.len() == self.scale.len() {
            self.mean.len()
        } else {
            0
        }
    }

    /// Scale a row-major matrix in place.
    ///
    /// The row width must equal `n_features()`; callers check this once at
    /// load time. Zero scale leaves the centred value unchanged.
    pub fn transform(&self, values: &mut [f64]) {
        let n = self.n_features();
        if n == 0 {
            return;
        }

        for row in values.chunks_mut(n) {
            for (j, x) in row.iter_mut().enumerate() {
                let scale = if self.scale[j] == 0.0 { 1.0 } else { self.scale[j] };
                *x = (*x - self.mean[j]) / scale;
            }
        }
    }
}
