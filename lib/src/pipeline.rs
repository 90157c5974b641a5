//! Scaling + regression pipeline.
//!
//! A [`Pipeline`] chains a [`StandardScaler`] and a [`LinearRegression`]:
//! the scaler is fitted on the training features, the regressor is fitted on
//! the scaled features, and prediction replays both steps in order. The
//! fitted form serializes through [`PipelineParams`] and can be written to
//! disk on its own, without bundle metadata.

use crate::error::{PipelineError, Result};
use crate::model::{Fitted, InferenceModel, LinearModel, LinearParams, LinearRegression};
use crate::preprocessing::{
    FittedStandardScaler, FittedTransformer, StandardScaler, StandardScalerParams, Transformer,
};
use crate::serialization::{ModelFormat, SerializableParams};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Step names, in execution order.
pub const STEP_NAMES: [&str; 2] = ["scaler", "regressor"];

/// Serializable parameters for a fitted pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    pub scaler: StandardScalerParams,
    pub regressor: LinearParams,
}

/// Unfitted pipeline.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    scaler: StandardScaler,
    regressor: LinearRegression,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the scaling step.
    pub fn with_scaler(mut self, scaler: StandardScaler) -> Self {
        self.scaler = scaler;
        self
    }

    /// Replace the regression step.
    pub fn with_regressor(mut self, regressor: LinearRegression) -> Self {
        self.regressor = regressor;
        self
    }

    /// Fit the scaler on `x`, then the regressor on the scaled `x` and `y`.
    pub fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<FittedPipeline> {
        if x.nrows() != y.len() {
            return Err(PipelineError::InvalidShape {
                expected: format!("{} targets", x.nrows()),
                got: format!("{} targets", y.len()),
            });
        }

        let scaler = self.scaler.fit(x)?;
        let scaled = scaler.transform(x)?;
        let regressor = self.regressor.fit(&scaled, y)?;

        Ok(FittedPipeline { scaler, regressor })
    }
}

/// Fitted pipeline ready for inference.
#[derive(Clone, Debug)]
pub struct FittedPipeline {
    scaler: FittedStandardScaler,
    regressor: LinearModel<Fitted>,
}

impl FittedPipeline {
    /// The fitted scaling step.
    pub fn scaler(&self) -> &FittedStandardScaler {
        &self.scaler
    }

    /// The fitted regression step.
    pub fn regressor(&self) -> &LinearModel<Fitted> {
        &self.regressor
    }

    pub fn step_names(&self) -> &'static [&'static str] {
        &STEP_NAMES
    }

    /// Number of raw (unscaled) input features.
    pub fn n_features_in(&self) -> usize {
        self.scaler.n_features_in()
    }

    /// Predict one value per row of `x`.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let scaled = self.scaler.transform(x)?;
        self.regressor.predict_batch(&scaled)
    }

    /// Predict a single sample given in training column order.
    pub fn predict_one(&self, sample: &[f64]) -> Result<f64> {
        let row = Array2::from_shape_vec((1, sample.len()), sample.to_vec()).map_err(|e| {
            PipelineError::InvalidShape {
                expected: format!("1 x {}", sample.len()),
                got: e.to_string(),
            }
        })?;
        let predictions = self.predict(&row)?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| PipelineError::EmptyData("no prediction produced".to_string()))
    }

    pub fn extract_params(&self) -> PipelineParams {
        PipelineParams {
            scaler: self.scaler.extract_params(),
            regressor: self.regressor.extract_params(),
        }
    }

    pub fn from_params(params: PipelineParams) -> Result<Self> {
        let scaler = FittedStandardScaler::from_params(params.scaler)?;
        let regressor = LinearModel::<Fitted>::from_params(params.regressor)?;
        if scaler.n_features_in() != regressor.n_features_in() {
            return Err(PipelineError::FeatureMismatch {
                expected_features: scaler.n_features_in(),
                got_features: regressor.n_features_in(),
            });
        }
        Ok(Self { scaler, regressor })
    }

    /// Save the bare pipeline (no bundle metadata); format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        ModelFormat::from_path(path)?.write(&self.extract_params(), path)
    }

    /// Load a bare pipeline written by [`FittedPipeline::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = ModelFormat::read_bytes(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_params(PipelineParams::from_bytes(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Axis};

    fn training_data() -> (Array2<f64>, Array1<f64>) {
        // y = 0.5*x0 + 10*x1 - 2 on very different feature scales
        let x = array![
            [100.0, 0.1],
            [250.0, 0.4],
            [300.0, 0.2],
            [420.0, 0.9],
            [510.0, 0.5],
            [640.0, 0.3]
        ];
        let y = x.map_axis(Axis(1), |r| 0.5 * r[0] + 10.0 * r[1] - 2.0);
        (x, y)
    }

    #[test]
    fn test_pipeline_fit_predict() {
        let (x, y) = training_data();
        let fitted = Pipeline::new().fit(&x, &y).unwrap();

        let pred = fitted.predict(&x).unwrap();
        for (p, t) in pred.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-8, "{} vs {}", p, t);
        }
        assert_eq!(fitted.n_features_in(), 2);
        assert_eq!(fitted.step_names(), &["scaler", "regressor"]);
    }

    #[test]
    fn test_pipeline_coefficients_live_in_scaled_space() {
        let (x, y) = training_data();
        let fitted = Pipeline::new().fit(&x, &y).unwrap();

        // Scaled coefficient = raw coefficient * feature std.
        let std = fitted.scaler().std();
        let coef = fitted.regressor().coefficients();
        assert!((coef[0] - 0.5 * std[0]).abs() < 1e-8);
        assert!((coef[1] - 10.0 * std[1]).abs() < 1e-8);
        // Intercept equals the target mean once features are centered.
        assert!((fitted.regressor().intercept() - y.mean().unwrap()).abs() < 1e-8);
    }

    #[test]
    fn test_predict_one_matches_batch() {
        let (x, y) = training_data();
        let fitted = Pipeline::new().fit(&x, &y).unwrap();

        let single = fitted.predict_one(&[300.0, 0.2]).unwrap();
        assert!((single - (0.5 * 300.0 + 10.0 * 0.2 - 2.0)).abs() < 1e-8);
    }

    #[test]
    fn test_predict_feature_mismatch() {
        let (x, y) = training_data();
        let fitted = Pipeline::new().fit(&x, &y).unwrap();
        assert!(matches!(
            fitted.predict_one(&[1.0, 2.0, 3.0]),
            Err(PipelineError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_fit_rejects_target_mismatch() {
        let (x, _) = training_data();
        let y = array![1.0, 2.0];
        assert!(matches!(
            Pipeline::new().fit(&x, &y),
            Err(PipelineError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_from_params_rejects_inconsistent_steps() {
        let (x, y) = training_data();
        let mut params = Pipeline::new().fit(&x, &y).unwrap().extract_params();
        params.regressor.coefficients.push(1.0);
        assert!(matches!(
            FittedPipeline::from_params(params),
            Err(PipelineError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_save_load_bare_pipeline() {
        let (x, y) = training_data();
        let fitted = Pipeline::new().fit(&x, &y).unwrap();

        let dir = tempfile::tempdir().unwrap();
        for name in ["pipeline.bin", "pipeline.zst"] {
            let path = dir.path().join(name);
            fitted.save(&path).unwrap();
            let loaded = FittedPipeline::load(&path).unwrap();
            assert_eq!(loaded.extract_params(), fitted.extract_params());
        }
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let (x, y) = training_data();
        let fitted = Pipeline::new().fit(&x, &y).unwrap();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            fitted.save(dir.path().join("pipeline.joblib")),
            Err(PipelineError::UnsupportedFormat(_))
        ));
    }
}
