use super::error::ApiError;
use super::store::{ModelStore, Prediction};
use crate::features::HousingFeatures;
use crate::metrics::TrainingMetrics;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub description: String,
    pub example: HousingFeatures,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<TrainingMetrics>,
}

/// `GET /`: usage hint with an example request body.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Housing Price Prediction API".to_string(),
        description: "Use the /predict endpoint to get predictions".to_string(),
        example: HousingFeatures::example(),
    })
}

/// `POST /predict`
pub async fn predict(
    State(store): State<Arc<ModelStore>>,
    Json(features): Json<HousingFeatures>,
) -> Result<Json<Prediction>, ApiError> {
    let predictor = match store.current() {
        Some(predictor) => predictor,
        None => {
            let store = Arc::clone(&store);
            tokio::task::spawn_blocking(move || store.get_or_load())
                .await
                .map_err(|e| ApiError::Internal(format!("Model load task failed: {}", e)))?
                .map_err(ApiError::from_load_error)?
        }
    };
    let prediction = predictor
        .predict(&features)
        .map_err(ApiError::from_prediction_error)?;

    debug!(
        price = prediction.predicted_price,
        dollars = prediction.predicted_price_dollars,
        "Prediction served"
    );
    Ok(Json(prediction))
}

/// `GET /health`: reports the slot state without triggering a reload.
pub async fn health(State(store): State<Arc<ModelStore>>) -> Json<HealthResponse> {
    let current = store.current();
    Json(HealthResponse {
        status: "ok".to_string(),
        model_loaded: current.is_some(),
        model_path: store.path().display().to_string(),
        metrics: current.and_then(|p| p.metrics()),
    })
}
