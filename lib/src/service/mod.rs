//! HTTP prediction service.
//!
//! | Route          | Purpose                                   |
//! |----------------|-------------------------------------------|
//! | `GET /`        | usage message and an example request body |
//! | `POST /predict`| price for one house                       |
//! | `GET /health`  | liveness and model status                 |
//!
//! A model that fails to load at startup does not stop the service; each
//! prediction request retries the load once until it succeeds.

pub mod error;
pub mod handlers;
pub mod store;

pub use self::error::ApiError;
pub use self::store::{ModelStore, Prediction, Predictor};

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// Builds the application router around a shared model store.
pub fn router(store: Arc<ModelStore>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .with_state(store)
}
