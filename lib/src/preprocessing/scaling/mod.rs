//! Scaling transformers for feature normalization.
//!
//! Only z-score standardization is needed by the housing pipeline: linear
//! regression coefficients become comparable once every feature has zero
//! mean and unit variance.

pub mod standard;

pub use standard::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
