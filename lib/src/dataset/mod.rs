//! Training data.
//!
//! The only dataset this crate trains on is California Housing: 20,640
//! block groups, eight numeric features and the median house value
//! (`MedHouseVal`, in units of $100,000) as target.
//!
//! # Example
//!
//! ```no_run
//! use housing_price::dataset::CaliforniaHousing;
//!
//! let data = CaliforniaHousing::load("datasets/california_housing.csv").unwrap();
//! let (train, test) = data.train_test_split(0.2, 42).unwrap();
//! assert_eq!(train.len() + test.len(), data.len());
//! ```

pub mod california_housing;

pub use self::california_housing::CaliforniaHousing;
