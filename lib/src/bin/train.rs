//! Trains the housing price pipeline and writes the model bundle.

use anyhow::Context;
use clap::Parser;
use housing_price::config::AppConfig;
use housing_price::features::HousingFeatures;
use housing_price::{predict_from_file, telemetry, trainer};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "housing-train", version, about = "Train and save the housing price pipeline")]
struct Args {
    /// Configuration file (TOML or YAML).
    #[arg(short, long, env = "HOUSING_CONFIG")]
    config: Option<PathBuf>,

    /// CSV with the eight features and MedHouseVal.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Download the dataset from here if the CSV is missing.
    #[arg(long)]
    dataset_url: Option<String>,

    /// Output path without extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Artifact format: bin or zst.
    #[arg(short, long)]
    format: Option<String>,

    #[arg(long)]
    test_size: Option<f64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Skip predicting the example house after saving.
    #[arg(long)]
    no_check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config =
        AppConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    let trainer_config = &mut config.trainer;
    if let Some(dataset) = args.dataset {
        trainer_config.dataset_path = dataset;
    }
    if let Some(url) = args.dataset_url {
        trainer_config.dataset_url = Some(url);
    }
    if let Some(output) = args.output {
        trainer_config.output = output;
    }
    if let Some(format) = args.format {
        trainer_config.format = format;
    }
    if let Some(test_size) = args.test_size {
        trainer_config.test_size = test_size;
    }
    if let Some(seed) = args.seed {
        trainer_config.seed = seed;
    }

    telemetry::init(&config.logging);

    let outcome = trainer::train_and_save(&config.trainer)
        .await
        .context("training failed")?;
    info!(
        path = %outcome.path.display(),
        n_train = outcome.n_train,
        n_test = outcome.n_test,
        "Pipeline saved successfully"
    );

    if !args.no_check {
        info!("--- Testing the saved model ---");
        let example = HousingFeatures::example().to_map();
        let price = predict_from_file(&outcome.path, &example)
            .context("failed to predict with the saved pipeline")?;
        info!(
            "Example house: {:.4} (x $100,000) = ${:.2}",
            price,
            price * 100_000.0
        );
    }

    Ok(())
}
