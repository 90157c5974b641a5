//! Regression models with compile-time fitted/unfitted state.

pub mod linear;
pub mod state;

pub use linear::{LinearModel, LinearParams, LinearRegression};
pub use state::{Fitted, Unfitted};

use crate::error::Result;

/// Inference interface shared by fitted models.
pub trait InferenceModel {
    type InputSingle: ?Sized;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;
    type Params;

    /// Predict on a single sample.
    fn predict(&self, input: &Self::InputSingle) -> Result<Self::OutputSingle>;

    /// Predict on a batch of samples (one per row).
    fn predict_batch(&self, input: &Self::InputBatch) -> Result<Self::OutputBatch>;

    /// Extract the learned parameters in serializable form.
    fn extract_params(&self) -> Self::Params;

    /// Rebuild a fitted model from its parameters.
    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;
}
