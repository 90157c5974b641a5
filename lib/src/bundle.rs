//! Model bundle: a fitted pipeline packaged with its training metadata.
//!
//! The trainer writes one bundle per run; the predictor only ever reads it.
//! Older or hand-exported artifacts may hold a bare [`FittedPipeline`]
//! instead, which [`Artifact::load`] accepts as a fallback.

use crate::error::{PipelineError, Result};
use crate::features::FEATURE_NAMES;
use crate::metrics::TrainingMetrics;
use crate::pipeline::{FittedPipeline, PipelineParams};
use crate::serialization::{ModelFormat, SerializableParams};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// On-disk form of a [`ModelBundle`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BundleParams {
    pub pipeline: PipelineParams,
    pub feature_names: Vec<String>,
    pub metrics: TrainingMetrics,
    pub coefficients: Vec<f64>,
}

/// A fitted pipeline plus the feature order it expects and its test metrics.
#[derive(Clone, Debug)]
pub struct ModelBundle {
    pipeline: FittedPipeline,
    feature_names: Vec<String>,
    metrics: TrainingMetrics,
    coefficients: Vec<f64>,
}

impl ModelBundle {
    /// Packages `pipeline`; `coefficients` are taken from its regressor.
    pub fn new(
        pipeline: FittedPipeline,
        feature_names: Vec<String>,
        metrics: TrainingMetrics,
    ) -> Result<Self> {
        if feature_names.len() != pipeline.n_features_in() {
            return Err(PipelineError::FeatureMismatch {
                expected_features: pipeline.n_features_in(),
                got_features: feature_names.len(),
            });
        }
        let coefficients = pipeline.regressor().coefficients().to_vec();
        Ok(Self {
            pipeline,
            feature_names,
            metrics,
            coefficients,
        })
    }

    pub fn pipeline(&self) -> &FittedPipeline {
        &self.pipeline
    }

    /// Column order the pipeline was trained on.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn metrics(&self) -> TrainingMetrics {
        self.metrics
    }

    /// Regressor coefficients in the scaled feature space.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn to_params(&self) -> BundleParams {
        BundleParams {
            pipeline: self.pipeline.extract_params(),
            feature_names: self.feature_names.clone(),
            metrics: self.metrics,
            coefficients: self.coefficients.clone(),
        }
    }

    pub fn from_params(params: BundleParams) -> Result<Self> {
        let pipeline = FittedPipeline::from_params(params.pipeline)?;
        if params.feature_names.len() != pipeline.n_features_in() {
            return Err(PipelineError::FeatureMismatch {
                expected_features: pipeline.n_features_in(),
                got_features: params.feature_names.len(),
            });
        }
        Ok(Self {
            pipeline,
            feature_names: params.feature_names,
            metrics: params.metrics,
            coefficients: params.coefficients,
        })
    }

    /// Writes the bundle to `base` plus the format's extension.
    ///
    /// Parent directories are created as needed. Returns the absolute path
    /// of the written file.
    pub fn save(&self, base: &Path, format: ModelFormat) -> Result<PathBuf> {
        let path = format.with_extension(base);
        info!(path = %path.display(), %format, "Saving pipeline");
        format.write(&self.to_params(), &path)?;

        let absolute = std::fs::canonicalize(&path)?;
        info!(path = %absolute.display(), "Pipeline saved");
        Ok(absolute)
    }

    /// Reads a bundle, choosing the format from the file extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading pipeline");

        let bytes = ModelFormat::read_bytes(path)?;
        let bundle = Self::from_bytes(&bytes)?;

        info!(features = %bundle.feature_names.join(", "), "Pipeline loaded");
        info!(
            "Model metrics - MSE: {:.4}, R²: {:.4}",
            bundle.metrics.mse, bundle.metrics.r2
        );
        Ok(bundle)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let params = BundleParams::from_bytes(bytes)
            .map_err(|e| PipelineError::MalformedArtifact(e.to_string()))?;
        Self::from_params(params)
    }
}

/// Whatever a model file turned out to contain.
#[derive(Clone, Debug)]
pub enum Artifact {
    Bundle(ModelBundle),
    /// A pipeline saved without metadata; it expects [`FEATURE_NAMES`] order.
    BarePipeline(FittedPipeline),
}

impl Artifact {
    /// Loads a bundle, falling back to a bare pipeline.
    ///
    /// Fails with [`PipelineError::ArtifactMissing`] when there is no file and
    /// [`PipelineError::MalformedArtifact`] when neither layout decodes.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = ModelFormat::read_bytes(path)?;

        let bundle_err = match ModelBundle::from_bytes(&bytes) {
            Ok(bundle) => return Ok(Artifact::Bundle(bundle)),
            Err(e) => e,
        };
        warn!(
            path = %path.display(),
            error = %bundle_err,
            "Not a valid model bundle, trying bare pipeline"
        );

        match FittedPipeline::from_bytes(&bytes) {
            Ok(pipeline) => {
                info!(path = %path.display(), "Loaded bare pipeline without metadata");
                Ok(Artifact::BarePipeline(pipeline))
            }
            Err(pipeline_err) => Err(PipelineError::MalformedArtifact(format!(
                "{}: not a model bundle ({}) nor a pipeline ({})",
                path.display(),
                bundle_err,
                pipeline_err
            ))),
        }
    }

    pub fn pipeline(&self) -> &FittedPipeline {
        match self {
            Artifact::Bundle(bundle) => bundle.pipeline(),
            Artifact::BarePipeline(pipeline) => pipeline,
        }
    }

    /// Input column order: the bundle's record, or the canonical order.
    pub fn feature_names(&self) -> Vec<String> {
        match self {
            Artifact::Bundle(bundle) => bundle.feature_names().to_vec(),
            Artifact::BarePipeline(_) => FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Test metrics, only known for full bundles.
    pub fn metrics(&self) -> Option<TrainingMetrics> {
        match self {
            Artifact::Bundle(bundle) => Some(bundle.metrics()),
            Artifact::BarePipeline(_) => None,
        }
    }
}

/// Loads the bundle at `path` and predicts one house given as name → value.
///
/// Every feature recorded in the bundle must be present in `data`; extra
/// keys are ignored. Returns the price in units of $100,000.
pub fn predict_from_file<P: AsRef<Path>>(path: P, data: &HashMap<String, f64>) -> Result<f64> {
    let bundle = ModelBundle::load(path)?;

    let values = bundle
        .feature_names()
        .iter()
        .map(|name| {
            data.get(name)
                .copied()
                .ok_or_else(|| PipelineError::MissingFeature(name.clone()))
        })
        .collect::<Result<Vec<f64>>>()?;

    let price = bundle.pipeline().predict_one(&values)?;
    info!("Predicted price for the house: ${:.2}", price * 100_000.0);
    Ok(price)
}
