//! The housing feature vector accepted by the predictor.
//!
//! Field names follow the California Housing column names exactly, so JSON
//! request bodies and CSV headers share one vocabulary.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical feature order the pipeline is trained on.
pub const FEATURE_NAMES: [&str; 8] = [
    "MedInc",
    "HouseAge",
    "AveRooms",
    "AveBedrms",
    "Population",
    "AveOccup",
    "Latitude",
    "Longitude",
];

/// Name of the regression target column.
pub const TARGET_NAME: &str = "MedHouseVal";

/// One block group's features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HousingFeatures {
    /// Median income in block group, in tens of thousands of dollars.
    pub med_inc: f64,
    /// Median house age in block group.
    pub house_age: f64,
    /// Average number of rooms per household.
    pub ave_rooms: f64,
    /// Average number of bedrooms per household.
    pub ave_bedrms: f64,
    /// Block group population.
    pub population: f64,
    /// Average number of household members.
    pub ave_occup: f64,
    /// Block group latitude.
    pub latitude: f64,
    /// Block group longitude.
    pub longitude: f64,
}

impl HousingFeatures {
    /// The documented example house used by `GET /` and the trainer's smoke check.
    pub fn example() -> Self {
        Self {
            med_inc: 8.5,
            house_age: 15.0,
            ave_rooms: 6.0,
            ave_bedrms: 2.0,
            population: 2000.0,
            ave_occup: 3.0,
            latitude: 37.88,
            longitude: -122.23,
        }
    }

    /// Looks a value up by its canonical column name.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "MedInc" => Some(self.med_inc),
            "HouseAge" => Some(self.house_age),
            "AveRooms" => Some(self.ave_rooms),
            "AveBedrms" => Some(self.ave_bedrms),
            "Population" => Some(self.population),
            "AveOccup" => Some(self.ave_occup),
            "Latitude" => Some(self.latitude),
            "Longitude" => Some(self.longitude),
            _ => None,
        }
    }

    /// Values arranged in the order of `names`.
    pub fn ordered<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<f64>> {
        names
            .iter()
            .map(|n| {
                let n = n.as_ref();
                self.get(n)
                    .ok_or_else(|| PipelineError::UnknownFeature(n.to_string()))
            })
            .collect()
    }

    /// Values in canonical [`FEATURE_NAMES`] order.
    pub fn to_vec(&self) -> Vec<f64> {
        FEATURE_NAMES
            .iter()
            .filter_map(|n| self.get(n))
            .collect()
    }

    /// Name → value map, keyed by canonical names.
    pub fn to_map(&self) -> HashMap<String, f64> {
        FEATURE_NAMES
            .iter()
            .filter_map(|n| self.get(n).map(|v| (n.to_string(), v)))
            .collect()
    }
}

impl TryFrom<&HashMap<String, f64>> for HousingFeatures {
    type Error = PipelineError;

    fn try_from(map: &HashMap<String, f64>) -> Result<Self> {
        let field = |name: &str| {
            map.get(name)
                .copied()
                .ok_or_else(|| PipelineError::MissingFeature(name.to_string()))
        };
        Ok(Self {
            med_inc: field("MedInc")?,
            house_age: field("HouseAge")?,
            ave_rooms: field("AveRooms")?,
            ave_bedrms: field("AveBedrms")?,
            population: field("Population")?,
            ave_occup: field("AveOccup")?,
            latitude: field("Latitude")?,
            longitude: field("Longitude")?,
        })
    }
}
