//! End-to-end walk through the housing price pipeline without the HTTP layer:
//! - build a small in-memory dataset with the eight California Housing features
//! - split, fit the scaler + regressor pipeline and score it
//! - save the bundle in both formats and load it back
//! - predict the example house from the saved file
//!
//! Run with: cargo run --example house_price_pipeline

use housing_price::bundle::{Artifact, ModelBundle};
use housing_price::dataset::CaliforniaHousing;
use housing_price::trainer::fit_bundle;
use housing_price::{predict_from_file, HousingFeatures, ModelFormat, FEATURE_NAMES};
use ndarray::{Array1, Array2};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Housing Price Pipeline ===\n");

    // 1. A deterministic toy dataset priced by a known linear rule.
    let ranges = [
        (0.5, 15.0),      // MedInc
        (1.0, 52.0),      // HouseAge
        (2.0, 10.0),      // AveRooms
        (0.8, 2.0),       // AveBedrms
        (100.0, 5000.0),  // Population
        (1.5, 5.0),       // AveOccup
        (32.5, 42.0),     // Latitude
        (-124.3, -114.3), // Longitude
    ];
    let n = 200;
    let features = Array2::from_shape_fn((n, 8), |(i, j)| {
        let u = ((i as f64 * 12.9898 + j as f64 * 78.233).sin() * 43_758.545).fract().abs();
        let (lo, hi) = ranges[j];
        lo + u * (hi - lo)
    });
    let target = Array1::from_iter(features.rows().into_iter().map(|r| {
        0.45 * r[0] + 0.01 * r[1] - 0.4 * r[6] - 0.4 * r[7] - 34.0
    }));
    let dataset = CaliforniaHousing::from_arrays(
        features,
        target,
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
    )?;
    println!("Dataset: {} samples, {} features", dataset.len(), dataset.n_features());

    // 2. Fit and evaluate
    let trained = fit_bundle(&dataset, 0.2, 42)?;
    let metrics = trained.bundle.metrics();
    println!(
        "Trained on {} samples, tested on {}: MSE {:.6}, R² {:.4}",
        trained.n_train, trained.n_test, metrics.mse, metrics.r2
    );
    println!("Scaled coefficients:");
    for (name, coef) in trained
        .bundle
        .feature_names()
        .iter()
        .zip(trained.bundle.coefficients())
    {
        println!("  {:<10} {:>10.4}", name, coef);
    }

    // 3. Persist in both formats and compare sizes
    let dir = std::env::temp_dir().join("housing_price_example");
    let mut saved = Vec::new();
    for format in [ModelFormat::Bincode, ModelFormat::Zstd] {
        let path = trained.bundle.save(&dir.join("modelo_precio_viviendas"), format)?;
        let size = std::fs::metadata(&path)?.len();
        println!("Saved {} ({} bytes)", path.display(), size);
        saved.push(path);
    }

    // 4. Reload and predict
    let reloaded = ModelBundle::load(&saved[1])?;
    assert_eq!(reloaded.coefficients(), trained.bundle.coefficients());

    let example = HousingFeatures::example();
    let price = predict_from_file(&saved[0], &example.to_map())?;
    println!("\nExample house {:?}", example);
    println!("Predicted price: {:.4} (${:.2})", price, price * 100_000.0);

    // 5. A bare pipeline still loads, with the canonical feature order
    let bare_path = dir.join("bare_pipeline.bin");
    trained.bundle.pipeline().save(&bare_path)?;
    match Artifact::load(&bare_path)? {
        Artifact::BarePipeline(pipeline) => {
            let bare_price = pipeline.predict_one(&example.to_vec())?;
            println!("Bare pipeline predicts the same: {}", bare_price == price);
        }
        Artifact::Bundle(_) => println!("Unexpected: bare pipeline decoded as a bundle"),
    }

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
