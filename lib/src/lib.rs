//! # housing-price
//!
//! Trains a house price regressor on the California Housing dataset and
//! serves its predictions over HTTP.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: the regressor carries its training state in the
//!   type system (`Unfitted` vs `Fitted`), so an unfitted model cannot predict.
//! - **Training/Inference Separation**: fitted components keep only what
//!   prediction needs and serialize through plain parameter structs.
//! - **One artifact, two processes**: the trainer writes a [`ModelBundle`];
//!   the service only reads it.
//!
//! ## Quick Start
//!
//! ```rust
//! use housing_price::pipeline::Pipeline;
//! use ndarray::array;
//!
//! let x = array![[1.0, 200.0], [2.0, 100.0], [3.0, 400.0], [4.0, 300.0]];
//! let y = array![3.0, 4.0, 8.0, 9.0];
//!
//! let fitted = Pipeline::new().fit(&x, &y).unwrap();
//! let price = fitted.predict_one(&[2.5, 250.0]).unwrap();
//! assert!(price.is_finite());
//! ```
//!
//! ## Module Structure
//!
//! - `features`: the eight named inputs and their canonical order
//! - `preprocessing`: `StandardScaler` and the transformer traits
//! - `model`: ordinary least squares with fitted/unfitted state
//! - `pipeline`: scaler followed by regressor
//! - `bundle`: the persisted pipeline plus metadata
//! - `dataset`: CSV loading and the train/test split
//! - `trainer`: the end-to-end training run
//! - `service`: the axum prediction service
//! - `config`, `telemetry`: layered settings and logging

pub mod bundle;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod preprocessing;
pub mod serialization;
pub mod service;
pub mod telemetry;
pub mod trainer;

pub use bundle::{predict_from_file, Artifact, ModelBundle};
pub use error::{PipelineError, Result};
pub use features::{HousingFeatures, FEATURE_NAMES};
pub use metrics::TrainingMetrics;
pub use pipeline::{FittedPipeline, Pipeline};
pub use serialization::ModelFormat;
