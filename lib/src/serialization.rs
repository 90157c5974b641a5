//! Serialization of fitted parameters and on-disk artifact formats.
//!
//! Fitted components expose plain-data parameter structs (`Vec<f64>`,
//! scalars) that are encoded with bincode. An artifact on disk is either the
//! raw bincode bytes (`.bin`) or the same bytes compressed with zstd (`.zst`).

use crate::error::{PipelineError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const ZSTD_LEVEL: i32 = 3;

/// A trait for parameter representations that can be serialized to and from bytes.
///
/// Implementors should contain only plain numerical data, never live
/// matrices or handles. Every serde type gets this for free.
pub trait SerializableParams: Sized {
    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// On-disk encoding of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// Plain bincode, `.bin`.
    Bincode,
    /// Bincode compressed with zstd, `.zst`.
    Zstd,
}

impl ModelFormat {
    /// File extension (without the dot) written for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ModelFormat::Bincode => "bin",
            ModelFormat::Zstd => "zst",
        }
    }

    /// Picks the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "bin" => Ok(ModelFormat::Bincode),
            "zst" => Ok(ModelFormat::Zstd),
            _ => Err(PipelineError::UnsupportedFormat(format!(
                "{} (unrecognised extension)",
                path.display()
            ))),
        }
    }

    /// `base` with this format's extension appended, e.g. `model` → `model.bin`.
    pub fn with_extension(&self, base: &Path) -> PathBuf {
        let mut name = base.as_os_str().to_owned();
        name.push(".");
        name.push(self.extension());
        PathBuf::from(name)
    }

    /// Wraps already-bincoded bytes for this format.
    pub fn encode(&self, bytes: Vec<u8>) -> Result<Vec<u8>> {
        match self {
            ModelFormat::Bincode => Ok(bytes),
            ModelFormat::Zstd => Ok(zstd::bulk::compress(&bytes, ZSTD_LEVEL)?),
        }
    }

    /// Reverses [`ModelFormat::encode`].
    pub fn decode(&self, bytes: Vec<u8>) -> Result<Vec<u8>> {
        match self {
            ModelFormat::Bincode => Ok(bytes),
            ModelFormat::Zstd => Ok(zstd::stream::decode_all(bytes.as_slice())?),
        }
    }

    /// Serializes `params` and writes them to `path` in this format.
    pub fn write<T: SerializableParams>(&self, params: &T, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = self.encode(params.to_bytes()?)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Reads the artifact bytes at `path`, undoing compression if needed.
    ///
    /// A missing file is reported as [`PipelineError::ArtifactMissing`].
    pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
        let format = Self::from_path(path)?;
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PipelineError::ArtifactMissing(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        format
            .decode(bytes)
            .map_err(|e| PipelineError::MalformedArtifact(e.to_string()))
    }
}

impl FromStr for ModelFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bin" | "bincode" => Ok(ModelFormat::Bincode),
            "zst" | "zstd" => Ok(ModelFormat::Zstd),
            other => Err(PipelineError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
