//! Layered configuration for the trainer and the predictor service.
//!
//! Sources, lowest priority first: built-in defaults, an optional file
//! (format from its extension) and `HOUSING__`-prefixed environment
//! variables, e.g. `HOUSING__SERVICE__BIND_ADDR=127.0.0.1:9000`.
//! Command-line flags are applied on top by the binaries.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "HOUSING";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub service: ServiceConfig,
    pub trainer: TrainerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub bind_addr: String,
    /// Artifact loaded at startup and on lazy reload.
    pub model_path: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            model_path: PathBuf::from("assets/predictionPipeline.bin"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub dataset_path: PathBuf,
    /// Where to download the CSV from when `dataset_path` is missing.
    pub dataset_url: Option<String>,
    pub test_size: f64,
    pub seed: u64,
    /// Artifact path without extension.
    pub output: PathBuf,
    /// `bin` or `zst`.
    pub format: String,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("datasets/california_housing.csv"),
            dataset_url: None,
            test_size: 0.2,
            seed: 42,
            output: PathBuf::from("modelo_precio_viviendas"),
            format: "bin".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads defaults, then `file` if given, then the environment.
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_prefix(file, ENV_PREFIX)
    }

    fn load_with_prefix(file: Option<&Path>, prefix: &str) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file).required(true));
        }
        builder = builder.add_source(config::Environment::with_prefix(prefix).separator("__"));

        builder.build()?.try_deserialize()
    }
}
