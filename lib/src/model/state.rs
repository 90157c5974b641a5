/// A marker type indicating that a model is **not yet trained**.
///
/// Used as the state parameter of [`LinearModel`](crate::model::linear::LinearModel):
/// an `Unfitted` model only carries hyperparameters and can be fitted, it
/// cannot predict.
#[derive(Debug, Clone, Copy)]
pub struct Unfitted;

/// A marker type indicating that a model has been **fully trained**.
///
/// A `Fitted` model contains only inference parameters (coefficients and
/// intercept), no training hyperparameters, and is what gets persisted.
#[derive(Debug, Clone, Copy)]
pub struct Fitted;
