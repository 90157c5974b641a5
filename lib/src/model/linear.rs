//! Ordinary least squares linear regression.
//!
//! This module implements a type-safe linear model with compile-time state tracking:
//! - [`LinearRegression`] = `LinearModel<Unfitted>`: hyperparameters only, can be fitted.
//! - [`LinearModel<Fitted>`]: inference-only, serializable predictor.
//!
//! Fitting solves the normal equations on centered data, so the intercept is
//! recovered as `ȳ - x̄·w` and never enters the linear system.

use crate::error::{PipelineError, Result};
pub use crate::model::state::{Fitted, Unfitted};
use crate::model::InferenceModel;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Relative pivot size below which the normal matrix is treated as singular.
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Learned parameters of a linear model: `y = coefficients · x + intercept`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// A linear model with state encoded at the type level.
///
/// - When `S = Unfitted`: exposes [`LinearRegression::fit`].
/// - When `S = Fitted`: implements [`InferenceModel`].
///
/// This enforces, at compile time, that you cannot call `predict()` on an untrained model.
#[derive(Clone, Debug)]
pub struct LinearModel<S> {
    fit_intercept: bool,
    coefficients: Array1<f64>,
    intercept: f64,
    _state: PhantomData<S>,
}

/// Alias for an **unfitted** linear regression model.
pub type LinearRegression = LinearModel<Unfitted>;

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Creates an unfitted regressor that fits an intercept.
    pub fn new() -> Self {
        Self {
            fit_intercept: true,
            coefficients: Array1::zeros(0),
            intercept: 0.0,
            _state: PhantomData,
        }
    }

    /// Whether to estimate an intercept. When false the model passes through the origin.
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Fits coefficients minimizing the squared error between `x · w + b` and `y`.
    ///
    /// # Errors
    /// - [`PipelineError::EmptyData`] if `x` has no rows or no columns
    /// - [`PipelineError::InvalidShape`] if `x` and `y` disagree on the number of samples
    /// - [`PipelineError::NumericalError`] if the features are linearly dependent
    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<LinearModel<Fitted>> {
        let (rows, cols) = x.dim();
        if rows == 0 || cols == 0 {
            return Err(PipelineError::EmptyData(
                "Cannot fit LinearRegression on empty data".to_string(),
            ));
        }
        if y.len() != rows {
            return Err(PipelineError::InvalidShape {
                expected: format!("{} targets", rows),
                got: format!("{} targets", y.len()),
            });
        }

        let (coefficients, intercept) = if self.fit_intercept {
            let x_mean = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(cols));
            let y_mean = y.mean().unwrap_or(0.0);
            let xc = x - &x_mean.view().insert_axis(Axis(0));
            let yc = y - y_mean;
            let w = solve_normal_equations(&xc, &yc)?;
            let b = y_mean - x_mean.dot(&w);
            (w, b)
        } else {
            (solve_normal_equations(x, y)?, 0.0)
        };

        Ok(LinearModel {
            fit_intercept: self.fit_intercept,
            coefficients,
            intercept,
            _state: PhantomData,
        })
    }
}

/// Solves `(XᵀX) w = Xᵀy` by Gaussian elimination with partial pivoting.
fn solve_normal_equations(x: &Array2<f64>, y: &Array1<f64>) -> Result<Array1<f64>> {
    let mut a = x.t().dot(x);
    let mut b = x.t().dot(y);
    let n = b.len();

    let scale = a.diag().iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return Err(PipelineError::NumericalError(
            "normal matrix is zero or non-finite".to_string(),
        ));
    }

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);
        if a[[pivot_row, col]].abs() <= SINGULAR_TOLERANCE * scale {
            return Err(PipelineError::NumericalError(format!(
                "normal matrix is singular at column {}; features are linearly dependent",
                col
            )));
        }
        if pivot_row != col {
            for k in 0..n {
                a.swap([col, k], [pivot_row, k]);
            }
            b.swap(col, pivot_row);
        }

        for row in col + 1..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut w = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[[row, k]] * w[k]).sum();
        w[row] = (b[row] - tail) / a[[row, row]];
    }
    Ok(w)
}

impl LinearModel<Fitted> {
    /// Creates a fitted linear model from explicit parameters.
    pub fn new(params: LinearParams) -> Self {
        Self {
            fit_intercept: params.intercept != 0.0,
            coefficients: Array1::from(params.coefficients),
            intercept: params.intercept,
            _state: PhantomData,
        }
    }

    /// Fitted coefficients, one per input feature.
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    /// Fitted intercept (0.0 when fitted without one).
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of features the model was fitted on.
    pub fn n_features_in(&self) -> usize {
        self.coefficients.len()
    }

    fn check_features(&self, got: usize) -> Result<()> {
        if got != self.coefficients.len() {
            return Err(PipelineError::FeatureMismatch {
                expected_features: self.coefficients.len(),
                got_features: got,
            });
        }
        Ok(())
    }
}

/// Inference for a trained linear model: `y = wᵀx + b`.
impl InferenceModel for LinearModel<Fitted> {
    type InputSingle = [f64];
    type OutputSingle = f64;
    type InputBatch = Array2<f64>;
    type OutputBatch = Array1<f64>;
    type Params = LinearParams;

    fn predict(&self, input: &[f64]) -> Result<f64> {
        self.check_features(input.len())?;
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(input.iter())
            .map(|(w, x)| w * x)
            .sum();
        Ok(dot + self.intercept)
    }

    fn predict_batch(&self, input: &Array2<f64>) -> Result<Array1<f64>> {
        self.check_features(input.ncols())?;
        Ok(input.dot(&self.coefficients) + self.intercept)
    }

    fn extract_params(&self) -> LinearParams {
        LinearParams {
            coefficients: self.coefficients.to_vec(),
            intercept: self.intercept,
        }
    }

    fn from_params(params: LinearParams) -> Result<Self> {
        if params.coefficients.is_empty() {
            return Err(PipelineError::EmptyData(
                "linear model has no coefficients".to_string(),
            ));
        }
        Ok(Self::new(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn fitted(coefficients: Vec<f64>, intercept: f64) -> LinearModel<Fitted> {
        LinearModel::<Fitted>::new(LinearParams {
            coefficients,
            intercept,
        })
    }

    #[test]
    fn test_fit_recovers_exact_plane() {
        // y = 2*x0 - 3*x1 + 5
        let x = array![[0.0, 1.0], [1.0, 0.0], [2.0, 2.0], [3.0, 5.0], [4.0, 1.5]];
        let y = x.map_axis(Axis(1), |r| 2.0 * r[0] - 3.0 * r[1] + 5.0);

        let model = LinearRegression::new().fit(&x, &y).unwrap();

        assert!((model.coefficients()[0] - 2.0).abs() < 1e-9);
        assert!((model.coefficients()[1] + 3.0).abs() < 1e-9);
        assert!((model.intercept() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_least_squares_residuals_are_orthogonal() {
        // Noisy data: residuals must be orthogonal to every centered column.
        let x = array![[1.0, 2.0], [2.0, 1.0], [3.0, 4.0], [4.0, 3.0], [5.0, 6.0], [6.0, 4.0]];
        let y = array![3.1, 2.9, 7.2, 6.8, 11.1, 9.7];

        let model = LinearRegression::new().fit(&x, &y).unwrap();
        let residuals = &y - &model.predict_batch(&x).unwrap();

        assert!(residuals.sum().abs() < 1e-9);
        for j in 0..2 {
            let dot: f64 = x.column(j).iter().zip(residuals.iter()).map(|(a, r)| a * r).sum();
            assert!(dot.abs() < 1e-8, "column {} not orthogonal: {}", j, dot);
        }
    }

    #[test]
    fn test_fit_without_intercept() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![2.0, 4.0, 6.0];

        let model = LinearRegression::new()
            .with_fit_intercept(false)
            .fit(&x, &y)
            .unwrap();

        assert!((model.coefficients()[0] - 2.0).abs() < 1e-12);
        assert_eq!(model.intercept(), 0.0);
    }

    #[test]
    fn test_fit_singular_features() {
        // second column is twice the first
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let y = array![1.0, 2.0, 3.0];

        assert!(matches!(
            LinearRegression::new().fit(&x, &y),
            Err(PipelineError::NumericalError(_))
        ));
    }

    #[test]
    fn test_fit_empty_data() {
        let x = Array2::<f64>::zeros((0, 3));
        let y = Array1::<f64>::zeros(0);
        assert!(matches!(
            LinearRegression::new().fit(&x, &y),
            Err(PipelineError::EmptyData(_))
        ));
    }

    #[test]
    fn test_fit_target_length_mismatch() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0, 3.0];
        assert!(matches!(
            LinearRegression::new().fit(&x, &y),
            Err(PipelineError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_predict_single_sample() {
        let model = fitted(vec![2.0, 3.0], 1.0);
        // y = 2*1 + 3*2 + 1 = 9
        assert_eq!(model.predict(&[1.0, 2.0]).unwrap(), 9.0);
    }

    #[test]
    fn test_predict_batch() {
        let model = fitted(vec![1.0, 2.0], 3.0);
        let pred = model.predict_batch(&array![[1.0, 1.0], [2.0, 2.0]]).unwrap();
        assert_eq!(pred.to_vec(), vec![6.0, 9.0]);
    }

    #[test]
    fn test_predict_feature_mismatch() {
        let model = fitted(vec![1.0, 2.0], 0.0);
        assert!(matches!(
            model.predict(&[1.0, 2.0, 3.0]),
            Err(PipelineError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
        assert!(model.predict_batch(&array![[1.0]]).is_err());
    }

    #[test]
    fn test_params_round_trip() {
        let model = fitted(vec![0.25, -1.5, 4.0], -0.75);
        let params = model.extract_params();
        let restored = LinearModel::<Fitted>::from_params(params.clone()).unwrap();
        assert_eq!(restored.extract_params(), params);
    }

    #[test]
    fn test_from_params_rejects_empty() {
        let params = LinearParams {
            coefficients: vec![],
            intercept: 1.0,
        };
        assert!(LinearModel::<Fitted>::from_params(params).is_err());
    }
}
