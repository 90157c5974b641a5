use crate::error::PipelineError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::fmt;

/// An error returned to HTTP clients as `{"detail": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// The model could not be loaded; retrying later may succeed.
    ModelUnavailable(String),
    /// The model exists but cannot serve this request.
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    /// Maps a failed (re)load of the artifact.
    pub fn from_load_error(err: PipelineError) -> Self {
        if matches!(err, PipelineError::MalformedArtifact(_)) {
            ApiError::Internal(format!(
                "Error processing the prediction, the model may have an invalid format: {}",
                err
            ))
        } else {
            ApiError::ModelUnavailable(format!("The model is not available: {}", err))
        }
    }

    /// Maps a failure while running the pipeline.
    pub fn from_prediction_error(err: PipelineError) -> Self {
        ApiError::Internal(format!("Error during prediction: {}", err))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ModelUnavailable(msg) | ApiError::Internal(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
