//! Shared data for the pipeline benchmarks.
//!
//! The real dataset is not needed to measure fit and predict cost, so the
//! benchmarks run on synthetic rows shaped like California Housing.

use housing_price::dataset::CaliforniaHousing;
use housing_price::{FittedPipeline, Pipeline, FEATURE_NAMES};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Rough per-feature ranges of the real dataset.
const RANGES: [(f64, f64); 8] = [
    (0.5, 15.0),
    (1.0, 52.0),
    (1.0, 10.0),
    (0.5, 2.0),
    (3.0, 6000.0),
    (1.0, 6.0),
    (32.5, 42.0),
    (-124.3, -114.3),
];

/// `n` synthetic samples with a linear target plus noise.
pub fn synthetic_housing(n: usize, seed: u64) -> CaliforniaHousing {
    let mut rng = StdRng::seed_from_u64(seed);
    let features = Array2::from_shape_fn((n, 8), |(_, j)| {
        let (lo, hi) = RANGES[j];
        rng.gen_range(lo..hi)
    });
    let target = Array1::from_iter(features.rows().into_iter().map(|row| {
        0.43 * row[0] + 0.01 * row[1] - 0.42 * row[6] - 0.43 * row[7] - 36.9
            + rng.gen_range(-0.5..0.5)
    }));
    CaliforniaHousing::from_arrays(
        features,
        target,
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
    )
    .expect("synthetic arrays have consistent shapes")
}

/// A pipeline fitted on 80% of `n` synthetic samples.
pub fn fitted_pipeline(n: usize) -> FittedPipeline {
    let data = synthetic_housing(n, 42);
    let (train, _) = data
        .train_test_split(0.2, 42)
        .expect("valid split parameters");
    Pipeline::new()
        .fit(train.features(), train.target())
        .expect("synthetic data is well conditioned")
}
