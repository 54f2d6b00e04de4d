// Online per-column mean/variance (Welford), mergeable across partial runs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard deviations below this are treated as zero spread and reported as
/// 1, so dividing by them leaves constant columns unscaled.
pub const STDEV_EPSILON: f64 = 1e-9;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScalerError {
    #[error("vector has {actual} columns, scaler expects {expected}")]
    WidthMismatch { expected: usize, actual: usize },
}

/// Mean and population standard deviation per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerStats {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnlineScaler {
    count: u64,
    mean: Vec<f64>,
    m2: Vec<f64>,
}

impl OnlineScaler {
    pub fn new(width: usize) -> Self {
        OnlineScaler {
            count: 0,
            mean: vec![0.0; width],
            m2: vec![0.0; width],
        }
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    fn check_width(&self, actual: usize) -> Result<(), ScalerError> {
        if actual != self.width() {
            return Err(ScalerError::WidthMismatch {
                expected: self.width(),
                actual,
            });
        }
        Ok(())
    }

    /// Fold in one row.
    pub fn update(&mut self, row: &[f64]) -> Result<(), ScalerError> {
        self.check_width(row.len())?;
        self.count += 1;
        let n = self.count as f64;
        for ((mean, m2), &x) in self.mean.iter_mut().zip(self.m2.iter_mut()).zip(row) {
            let delta = x - *mean;
            *mean += delta / n;
            *m2 += delta * (x - *mean);
        }
        Ok(())
    }

    /// Combine with a scaler that saw a disjoint set of rows.
    pub fn merge(&mut self, other: &OnlineScaler) -> Result<(), ScalerError> {
        self.check_width(other.width())?;
        if other.count == 0 {
            return Ok(());
        }
        if self.count == 0 {
            *self = other.clone();
            return Ok(());
        }
        let na = self.count as f64;
        let nb = other.count as f64;
        let n = na + nb;
        for i in 0..self.width() {
            let delta = other.mean[i] - self.mean[i];
            self.mean[i] += delta * nb / n;
            self.m2[i] += other.m2[i] + delta * delta * na * nb / n;
        }
        self.count += other.count;
        Ok(())
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Population standard deviation per column, clamped to 1 where the
    /// column is (numerically) constant.
    pub fn std(&self) -> Vec<f64> {
        if self.count == 0 {
            return vec![1.0; self.width()];
        }
        let n = self.count as f64;
        self.m2
            .iter()
            .map(|m2| {
                let std = (m2 / n).max(0.0).sqrt();
                if std < STDEV_EPSILON {
                    1.0
                } else {
                    std
                }
            })
            .collect()
    }

    pub fn stats(&self) -> ScalerStats {
        ScalerStats {
            mean: self.mean.clone(),
            std: self.std(),
        }
    }
}
