//! The shared model slot behind the HTTP handlers.

use crate::bundle::Artifact;
use crate::error::{PipelineError, Result};
use crate::features::HousingFeatures;
use crate::metrics::TrainingMetrics;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// The target is expressed in units of $100,000.
pub const DOLLARS_PER_UNIT: f64 = 100_000.0;

/// Response body of `POST /predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// In units of $100,000.
    pub predicted_price: f64,
    pub predicted_price_dollars: f64,
}

impl Prediction {
    pub fn from_price(predicted_price: f64) -> Self {
        Self {
            predicted_price,
            predicted_price_dollars: predicted_price * DOLLARS_PER_UNIT,
        }
    }
}

/// A loaded artifact together with the column order it expects.
#[derive(Debug)]
pub struct Predictor {
    artifact: Artifact,
    feature_names: Vec<String>,
}

impl Predictor {
    pub fn new(artifact: Artifact) -> Self {
        let feature_names = artifact.feature_names();
        Self {
            artifact,
            feature_names,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Artifact::load(path).map(Self::new)
    }

    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    pub fn metrics(&self) -> Option<TrainingMetrics> {
        self.artifact.metrics()
    }

    /// Orders `features` by the artifact's column list and predicts.
    ///
    /// A price that is not finite in either unit is a
    /// [`PipelineError::NumericalError`].
    pub fn predict(&self, features: &HousingFeatures) -> Result<Prediction> {
        let row = features.ordered(self.feature_names.as_slice())?;
        let price = self.artifact.pipeline().predict_one(&row)?;
        let prediction = Prediction::from_price(price);
        if !prediction.predicted_price.is_finite() || !prediction.predicted_price_dollars.is_finite()
        {
            return Err(PipelineError::NumericalError(format!(
                "predicted price {} is out of range",
                price
            )));
        }
        Ok(prediction)
    }
}

/// Lazily filled, shared-read holder of the current [`Predictor`].
#[derive(Debug)]
pub struct ModelStore {
    path: PathBuf,
    slot: RwLock<Option<Arc<Predictor>>>,
}

impl ModelStore {
    /// An empty store for the artifact at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            slot: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Startup load. Failure is logged and leaves the slot empty.
    pub fn load(&self) -> bool {
        match Predictor::load(&self.path) {
            Ok(predictor) => {
                info!(path = %self.path.display(), "Model loaded");
                *self.slot.write() = Some(Arc::new(predictor));
                true
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to load model");
                false
            }
        }
    }

    /// The loaded predictor, if any, without touching the disk.
    pub fn current(&self) -> Option<Arc<Predictor>> {
        self.slot.read().clone()
    }

    /// The loaded predictor; an empty slot gets one reload attempt.
    ///
    /// The file is read without holding the lock, so readers of
    /// [`ModelStore::current`] never wait on disk I/O. This call blocks;
    /// async callers run it on the blocking pool.
    pub fn get_or_load(&self) -> Result<Arc<Predictor>> {
        if let Some(predictor) = self.current() {
            return Ok(predictor);
        }

        warn!(path = %self.path.display(), "Model not loaded, retrying");
        let loaded = Arc::new(Predictor::load(&self.path)?);

        let mut slot = self.slot.write();
        // a concurrent reload may have filled the slot first
        let predictor = slot.get_or_insert_with(|| {
            info!(path = %self.path.display(), "Model loaded on demand");
            loaded
        });
        Ok(Arc::clone(predictor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::ModelBundle;
    use crate::features::FEATURE_NAMES;
    use crate::metrics::TrainingMetrics;
    use crate::pipeline::{FittedPipeline, Pipeline};
    use crate::serialization::ModelFormat;
    use ndarray::{Array1, Array2, Axis};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn fitted_eight() -> FittedPipeline {
        let mut rng = StdRng::seed_from_u64(7);
        let x = Array2::from_shape_fn((60, 8), |_| rng.gen_range(0.0..10.0));
        let y: Array1<f64> = x.map_axis(Axis(1), |r| {
            r.iter().enumerate().map(|(j, v)| (j as f64 + 1.0) * v).sum::<f64>() + 3.0
        });
        Pipeline::new().fit(&x, &y).unwrap()
    }

    fn predictor_with_names(names: Vec<String>) -> Predictor {
        let bundle =
            ModelBundle::new(fitted_eight(), names, TrainingMetrics { mse: 0.0, r2: 1.0 }).unwrap();
        Predictor::new(Artifact::Bundle(bundle))
    }

    fn canonical_names() -> Vec<String> {
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prediction_scales_to_dollars() {
        let p = Prediction::from_price(4.526);
        assert_eq!(p.predicted_price_dollars, 4.526 * 100_000.0);
    }

    #[test]
    fn test_empty_store_reports_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("absent.bin"));

        assert!(!store.load());
        assert!(store.current().is_none());
        assert!(matches!(
            store.get_or_load(),
            Err(PipelineError::ArtifactMissing(_))
        ));
        assert!(store.current().is_none());
    }

    #[test]
    fn test_predict_follows_recorded_column_order() {
        let reversed: Vec<String> = canonical_names().into_iter().rev().collect();
        let predictor = predictor_with_names(reversed);
        let features = HousingFeatures::example();

        let mut row = features.to_vec();
        row.reverse();
        let expected = predictor.artifact().pipeline().predict_one(&row).unwrap();
        let canonical = predictor.artifact().pipeline().predict_one(&features.to_vec()).unwrap();

        let prediction = predictor.predict(&features).unwrap();
        assert_eq!(prediction.predicted_price, expected);
        assert_ne!(prediction.predicted_price, canonical);
    }

    #[test]
    fn test_out_of_range_price_is_numerical_error() {
        let predictor = predictor_with_names(canonical_names());
        let features = HousingFeatures {
            med_inc: 1e308,
            ..HousingFeatures::example()
        };
        assert!(matches!(
            predictor.predict(&features),
            Err(PipelineError::NumericalError(_))
        ));
        assert!(predictor.predict(&HousingFeatures::example()).is_ok());
    }

    #[test]
    fn test_concurrent_reloads_fill_one_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ModelStore::new(dir.path().join("model.bin")));
        assert!(!store.load());

        let bundle =
            ModelBundle::new(fitted_eight(), canonical_names(), TrainingMetrics { mse: 0.0, r2: 1.0 })
                .unwrap();
        bundle.save(&dir.path().join("model"), ModelFormat::Bincode).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.get_or_load().unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let first = store.current().unwrap();
        let again = store.get_or_load().unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }
}
