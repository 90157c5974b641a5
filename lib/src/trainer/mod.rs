//! Training run: load data, split, fit, evaluate, persist.
//!
//! [`train_and_save`] is what the `housing-train` binary runs. The pure
//! fitting part is exposed separately as [`fit_bundle`] so it can be driven
//! from in-memory data.

use crate::bundle::ModelBundle;
use crate::config::TrainerConfig;
use crate::dataset::CaliforniaHousing;
use crate::error::Result;
use crate::metrics::TrainingMetrics;
use crate::pipeline::Pipeline;
use crate::serialization::ModelFormat;
use std::path::PathBuf;
use tracing::info;

/// A fitted bundle and the split sizes it came from.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub bundle: ModelBundle,
    pub n_train: usize,
    pub n_test: usize,
}

/// Summary of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Absolute path of the written artifact.
    pub path: PathBuf,
    pub metrics: TrainingMetrics,
    pub n_train: usize,
    pub n_test: usize,
}

/// Splits `dataset`, fits the pipeline on the train part and scores it on
/// the test part.
pub fn fit_bundle(dataset: &CaliforniaHousing, test_size: f64, seed: u64) -> Result<TrainedModel> {
    let (train, test) = dataset.train_test_split(test_size, seed)?;
    info!(
        "Data split: {} training samples, {} test samples",
        train.len(),
        test.len()
    );

    info!("Creating and training pipeline...");
    let fitted = Pipeline::new().fit(train.features(), train.target())?;

    let predictions = fitted.predict(test.features())?;
    let metrics = TrainingMetrics::compute(
        &test.target().to_vec(),
        &predictions.to_vec(),
    );
    info!(
        "Model trained. MSE: {:.4}, R²: {:.4}",
        metrics.mse, metrics.r2
    );

    let bundle = ModelBundle::new(fitted, dataset.feature_names().to_vec(), metrics)?;
    Ok(TrainedModel {
        bundle,
        n_train: train.len(),
        n_test: test.len(),
    })
}

/// Runs a full training pass as configured and writes the bundle.
///
/// The output format is validated before the dataset is touched.
pub async fn train_and_save(config: &TrainerConfig) -> Result<TrainingOutcome> {
    let format: ModelFormat = config.format.parse()?;

    info!("Loading California Housing dataset...");
    let dataset =
        CaliforniaHousing::fetch(&config.dataset_path, config.dataset_url.as_deref()).await?;
    info!(
        "Dataset loaded: {} samples, {} features",
        dataset.len(),
        dataset.n_features()
    );
    info!("Features: {}", dataset.feature_names().join(", "));

    let trained = fit_bundle(&dataset, config.test_size, config.seed)?;
    let path = trained.bundle.save(&config.output, format)?;

    Ok(TrainingOutcome {
        path,
        metrics: trained.bundle.metrics(),
        n_train: trained.n_train,
        n_test: trained.n_test,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::features::FEATURE_NAMES;
    use ndarray::{Array1, Array2};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const WEIGHTS: [f64; 8] = [0.4, 0.01, -0.1, 0.6, 0.0001, -0.004, -0.4, -0.4];

    fn synthetic_dataset(n: usize) -> CaliforniaHousing {
        let mut rng = StdRng::seed_from_u64(3);
        let features = Array2::from_shape_fn((n, 8), |_| rng.gen_range(0.0..10.0));
        let target = Array1::from_iter(features.rows().into_iter().map(|row| {
            row.iter().zip(WEIGHTS.iter()).map(|(x, w)| x * w).sum::<f64>() + 2.0
        }));
        CaliforniaHousing::from_arrays(
            features,
            target,
            FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_fit_bundle_on_noiseless_data() {
        let trained = fit_bundle(&synthetic_dataset(200), 0.2, 42).unwrap();
        assert_eq!(trained.n_test, 40);
        assert_eq!(trained.n_train, 160);

        let metrics = trained.bundle.metrics();
        assert!(metrics.mse < 1e-12, "mse = {}", metrics.mse);
        assert!((metrics.r2 - 1.0).abs() < 1e-9, "r2 = {}", metrics.r2);
        assert_eq!(trained.bundle.feature_names().len(), 8);
        assert_eq!(trained.bundle.coefficients().len(), 8);
    }

    #[tokio::test]
    async fn test_train_and_save_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("housing.csv");
        let data = synthetic_dataset(50);
        let mut writer = csv::Writer::from_path(&csv_path).unwrap();
        writer
            .write_record(FEATURE_NAMES.iter().chain(["MedHouseVal"].iter()))
            .unwrap();
        for (row, y) in data.features().rows().into_iter().zip(data.target().iter()) {
            let mut record: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            record.push(y.to_string());
            writer.write_record(&record).unwrap();
        }
        writer.flush().unwrap();

        let config = TrainerConfig {
            dataset_path: csv_path,
            output: dir.path().join("out/model"),
            format: "ZST".to_string(),
            ..TrainerConfig::default()
        };
        let outcome = train_and_save(&config).await.unwrap();

        assert!(outcome.path.is_absolute());
        assert!(outcome.path.ends_with("out/model.zst"));
        assert_eq!(outcome.n_train + outcome.n_test, 50);
        assert_eq!(outcome.n_test, 10);
        assert!(outcome.metrics.r2 > 0.999);
    }

    #[tokio::test]
    async fn test_unsupported_format_fails_before_loading_data() {
        let config = TrainerConfig {
            dataset_path: PathBuf::from("does/not/exist.csv"),
            format: "joblib".to_string(),
            ..TrainerConfig::default()
        };
        assert!(matches!(
            train_and_save(&config).await,
            Err(PipelineError::UnsupportedFormat(_))
        ));
    }
}
