//! Error types shared by training, persistence and prediction.

use std::fmt;
use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Error type for pipeline fitting, artifact persistence and prediction.
#[derive(Debug)]
pub enum PipelineError {
    /// Shape mismatch between expected and actual matrix dimensions.
    InvalidShape { expected: String, got: String },
    /// Numerical computation error (singular system, non-finite values).
    NumericalError(String),
    /// Invalid hyperparameter or configuration value.
    InvalidParameter(String),
    /// Serialization or deserialization error.
    SerializationError(String),
    /// I/O error during file operations.
    IoError(String),
    /// Empty data provided where non-empty was required.
    EmptyData(String),
    /// Feature dimension mismatch.
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// Save format or artifact extension that is neither bincode nor zstd.
    UnsupportedFormat(String),
    /// A feature name recorded in a bundle has no matching input field.
    UnknownFeature(String),
    /// A feature required by the model was not supplied.
    MissingFeature(String),
    /// No artifact exists at the given path.
    ArtifactMissing(PathBuf),
    /// The artifact exists but decodes neither as a bundle nor as a bare pipeline.
    MalformedArtifact(String),
    /// The reference dataset could not be read or downloaded.
    DatasetError(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidShape { expected, got } => {
                write!(f, "Invalid shape: expected {}, got {}", expected, got)
            }
            PipelineError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            PipelineError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PipelineError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            PipelineError::IoError(msg) => write!(f, "I/O error: {}", msg),
            PipelineError::EmptyData(msg) => write!(f, "Empty data: {}", msg),
            PipelineError::FeatureMismatch {
                expected_features,
                got_features,
            } => write!(
                f,
                "Feature mismatch: expected {} features, got {}",
                expected_features, got_features
            ),
            PipelineError::UnsupportedFormat(fmt_name) => write!(
                f,
                "Unsupported format '{}': use 'bin' (bincode) or 'zst' (zstd-compressed bincode)",
                fmt_name
            ),
            PipelineError::UnknownFeature(name) => write!(f, "Unknown feature: {}", name),
            PipelineError::MissingFeature(name) => {
                write!(f, "Missing feature '{}' in the provided data", name)
            }
            PipelineError::ArtifactMissing(path) => {
                write!(f, "Model artifact not found at {}", path.display())
            }
            PipelineError::MalformedArtifact(msg) => write!(f, "Malformed artifact: {}", msg),
            PipelineError::DatasetError(msg) => write!(f, "Dataset error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PipelineError {
    fn from(err: bincode::Error) -> Self {
        PipelineError::SerializationError(err.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::DatasetError(err.to_string())
    }
}
