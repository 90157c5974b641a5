//! Data preprocessing transformers.
//!
//! Transformers follow the same fitted/unfitted split as the models in this
//! crate: an unfitted [`Transformer`] holds hyperparameters and learns from
//! data, and its [`FittedTransformer`] carries the learned parameters,
//! transforms new data and can be saved and loaded.
//!
//! # Example
//!
//! ```
//! use housing_price::preprocessing::{FittedStandardScaler, FittedTransformer, StandardScaler, Transformer};
//! use ndarray::array;
//!
//! let train = array![[1.0, 10.0], [3.0, 30.0]];
//! let fitted = StandardScaler::new().fit(&train).unwrap();
//! let params = fitted.extract_params();
//! let restored = FittedStandardScaler::from_params(params).unwrap();
//! assert_eq!(restored.transform(&train).unwrap(), fitted.transform(&train).unwrap());
//! ```

pub mod scaling;
pub mod traits;

pub use scaling::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
pub use traits::{FittedTransformer, Transformer};
