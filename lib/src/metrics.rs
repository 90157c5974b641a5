//! Regression metrics used to evaluate the fitted pipeline.

use serde::{Deserialize, Serialize};

/// Calculate Mean Squared Error (MSE).
///
/// MSE = mean((y_true - y_pred)^2). Returns 0.0 for empty input.
///
/// # Panics
/// If the slices have different lengths.
pub fn mse(y_true: &[f64], y_pred: &[f64]) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "Arrays must have the same length"
    );
    if y_true.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p).powi(2))
        .sum();
    sum_sq / y_true.len() as f64
}

/// Calculate Root Mean Squared Error (RMSE), in the same units as the target.
pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> f64 {
    mse(y_true, y_pred).sqrt()
}

/// Calculate Mean Absolute Error (MAE).
///
/// # Panics
/// If the slices have different lengths.
pub fn mae(y_true: &[f64], y_pred: &[f64]) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "Arrays must have the same length"
    );
    if y_true.is_empty() {
        return 0.0;
    }

    let sum_abs: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p).abs())
        .sum();
    sum_abs / y_true.len() as f64
}

/// Calculate R² (coefficient of determination).
///
/// R² = 1 - SS_res / SS_tot. Negative when the model is worse than
/// predicting the mean. With constant targets it is 1.0 for a perfect fit
/// and 0.0 otherwise.
///
/// # Panics
/// If the slices have different lengths.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "Arrays must have the same length"
    );
    if y_true.is_empty() {
        return 0.0;
    }

    let mean_true = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|&t| (t - mean_true).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// The two summary metrics recorded in a model bundle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub mse: f64,
    pub r2: f64,
}

impl TrainingMetrics {
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> Self {
        Self {
            mse: mse(y_true, y_pred),
            r2: r2_score(y_true, y_pred),
        }
    }
}

/// All regression metrics at once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionReport {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionReport {
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> Self {
        let mse = mse(y_true, y_pred);
        Self {
            mse,
            rmse: mse.sqrt(),
            mae: mae(y_true, y_pred),
            r2: r2_score(y_true, y_pred),
        }
    }
}

impl From<RegressionReport> for TrainingMetrics {
    fn from(report: RegressionReport) -> Self {
        Self {
            mse: report.mse,
            r2: report.r2,
        }
    }
}
