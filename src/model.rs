use anyhow::{bail, Result};
use serde::Deserialize;

use crate::error::PredictError;

/// Trained regressor over the expanded feature space.
pub trait Regressor {
    fn n_features(&self) -> usize;
    fn predict(&self, x: &[f64]) -> Result<f64, PredictError>;
}

#[derive(Deserialize)]
struct LinearJson {
    coef: Vec<f64>,
    intercept: f64,
}

/// Ordinary linear model: `intercept + coef · x`.
#[derive(Debug, Clone)]
pub struct LinearRegression {
    coef: Vec<f64>,
    intercept: f64,
}

impl LinearRegression {
    pub fn new(coef: Vec<f64>, intercept: f64) -> Result<Self> {
        if coef.is_empty() {
            bail!("model has no coefficients");
        }
        if let Some(i) = coef.iter().position(|c| !c.is_finite()) {
            bail!("model coefficient {} is not finite", i);
        }
        if !intercept.is_finite() {
            bail!("model intercept is not finite");
        }
        Ok(Self { coef, intercept })
    }
}

impl<'de> Deserialize<'de> for LinearRegression {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = LinearJson::deserialize(deserializer)?;
        LinearRegression::new(raw.coef, raw.intercept).map_err(serde::de::Error::custom)
    }
}

impl Regressor for LinearRegression {
    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn predict(&self, x: &[f64]) -> Result<f64, PredictError> {
        if x.len() != self.coef.len() {
            return Err(PredictError::DimensionMismatch {
                stage: "model",
                expected: self.coef.len(),
                got: x.len(),
            });
        }
        let dot: f64 = self.coef.iter().zip(x).map(|(c, v)| c * v).sum();
        Ok(self.intercept + dot)
    }
}
