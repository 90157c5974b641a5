#![allow(dead_code)]

use housing_price::dataset::CaliforniaHousing;
use housing_price::trainer::{fit_bundle, TrainedModel};
use housing_price::FEATURE_NAMES;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Feature ranges roughly matching the real dataset.
const RANGES: [(f64, f64); 8] = [
    (0.5, 15.0),
    (1.0, 52.0),
    (2.0, 10.0),
    (0.8, 2.0),
    (100.0, 5000.0),
    (1.5, 5.0),
    (32.5, 42.0),
    (-124.3, -114.3),
];

const WEIGHTS: [f64; 8] = [0.43, 0.009, -0.1, 0.6, 0.0, -0.004, -0.42, -0.43];

/// A noisy synthetic stand-in for California Housing.
pub fn synthetic_housing(n: usize, seed: u64) -> CaliforniaHousing {
    let mut rng = StdRng::seed_from_u64(seed);
    let features = Array2::from_shape_fn((n, 8), |(_, j)| {
        let (lo, hi) = RANGES[j];
        rng.gen_range(lo..hi)
    });
    let target = Array1::from_iter(features.rows().into_iter().map(|row| {
        let signal: f64 = row.iter().zip(WEIGHTS.iter()).map(|(x, w)| x * w).sum();
        signal - 36.9 + rng.gen_range(-0.3..0.3)
    }));
    CaliforniaHousing::from_arrays(
        features,
        target,
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
    )
    .unwrap()
}

pub fn trained() -> TrainedModel {
    fit_bundle(&synthetic_housing(500, 11), 0.2, 42).unwrap()
}
