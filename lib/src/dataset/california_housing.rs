use crate::error::{PipelineError, Result};
use crate::features::{FEATURE_NAMES, TARGET_NAME};
use csv::ReaderBuilder;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;
use tracing::{info, warn};

/// California Housing dataset loader.
///
/// Expects a CSV with a header row and nine columns:
/// - MedInc: Median income in block group
/// - HouseAge: Median house age in block group
/// - AveRooms: Average number of rooms per household
/// - AveBedrms: Average number of bedrooms per household
/// - Population: Block group population
/// - AveOccup: Average number of household members
/// - Latitude: Block group latitude
/// - Longitude: Block group longitude
/// - MedHouseVal: Median house value, the target
#[derive(Debug, Clone)]
pub struct CaliforniaHousing {
    features: Array2<f64>,
    target: Array1<f64>,
    feature_names: Vec<String>,
}

impl CaliforniaHousing {
    /// Builds a dataset from in-memory arrays.
    pub fn from_arrays(
        features: Array2<f64>,
        target: Array1<f64>,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        if features.nrows() != target.len() {
            return Err(PipelineError::InvalidShape {
                expected: format!("{} targets", features.nrows()),
                got: format!("{} targets", target.len()),
            });
        }
        if features.ncols() != feature_names.len() {
            return Err(PipelineError::FeatureMismatch {
                expected_features: feature_names.len(),
                got_features: features.ncols(),
            });
        }
        Ok(Self {
            features,
            target,
            feature_names,
        })
    }

    /// Load the dataset from CSV.
    ///
    /// The header must list the eight features in canonical order followed
    /// by the target. A cell that does not parse as a number is an error
    /// naming its line and column.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;

        let expected: Vec<&str> = FEATURE_NAMES.iter().copied().chain([TARGET_NAME]).collect();
        let headers = rdr.headers()?.clone();
        if headers.iter().ne(expected.iter().copied()) {
            return Err(PipelineError::DatasetError(format!(
                "{}: expected columns [{}], found [{}]",
                path.display(),
                expected.join(", "),
                headers.iter().collect::<Vec<_>>().join(", ")
            )));
        }

        let mut values = Vec::new();
        let mut target = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            for (col, cell) in record.iter().enumerate() {
                let value: f64 = cell.parse().map_err(|_| {
                    PipelineError::DatasetError(format!(
                        "{}: line {}: column {} has non-numeric value {:?}",
                        path.display(),
                        line,
                        expected[col],
                        cell
                    ))
                })?;
                if col < FEATURE_NAMES.len() {
                    values.push(value);
                } else {
                    target.push(value);
                }
            }
        }

        if target.is_empty() {
            return Err(PipelineError::EmptyData(format!(
                "{} contains no samples",
                path.display()
            )));
        }

        let features = Array2::from_shape_vec((target.len(), FEATURE_NAMES.len()), values)
            .map_err(|e| PipelineError::DatasetError(e.to_string()))?;

        Self::from_arrays(
            features,
            Array1::from(target),
            FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Loads from `path`, downloading the CSV from `url` first if the file
    /// does not exist yet.
    pub async fn fetch<P: AsRef<Path>>(path: P, url: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        let Some(url) = url else {
            return Err(PipelineError::DatasetError(format!(
                "{} does not exist and no download URL is configured",
                path.display()
            )));
        };

        warn!(path = %path.display(), %url, "Dataset missing, downloading");
        let body = download(url).await?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &body)?;
        info!(path = %path.display(), bytes = body.len(), "Dataset downloaded");

        Self::load(path)
    }

    /// Get the number of samples in the dataset.
    pub fn len(&self) -> usize {
        self.target.len()
    }

    /// Check if the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Get the number of features.
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn target(&self) -> &Array1<f64> {
        &self.target
    }

    /// Owned copies of the feature matrix and target vector.
    pub fn to_arrays(&self) -> (Array2<f64>, Array1<f64>) {
        (self.features.clone(), self.target.clone())
    }

    /// Randomly split into `(train, test)`.
    ///
    /// The test split gets `ceil(len * test_size)` samples drawn from a
    /// permutation seeded with `seed`, so equal seeds give equal splits.
    pub fn train_test_split(&self, test_size: f64, seed: u64) -> Result<(Self, Self)> {
        if !(test_size > 0.0 && test_size < 1.0) {
            return Err(PipelineError::InvalidParameter(format!(
                "test_size must be in (0, 1), got {}",
                test_size
            )));
        }

        let n_samples = self.len();
        let n_test = (n_samples as f64 * test_size).ceil() as usize;
        if n_test == 0 || n_test >= n_samples {
            return Err(PipelineError::InvalidParameter(format!(
                "test_size {} leaves an empty split for {} samples",
                test_size, n_samples
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
        let (test_idx, train_idx) = indices.split_at(n_test);

        Ok((self.select(train_idx), self.select(test_idx)))
    }

    fn select(&self, rows: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), rows),
            target: self.target.select(Axis(0), rows),
            feature_names: self.feature_names.clone(),
        }
    }
}

async fn download(url: &str) -> Result<Vec<u8>> {
    let to_err = |e: reqwest::Error| PipelineError::DatasetError(format!("download {}: {}", url, e));
    let response = reqwest::get(url)
        .await
        .map_err(to_err)?
        .error_for_status()
        .map_err(to_err)?;
    let body = response.bytes().await.map_err(to_err)?;
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "MedInc,HouseAge,AveRooms,AveBedrms,Population,AveOccup,Latitude,Longitude,MedHouseVal";

    fn write_csv(dir: &Path, rows: &[&str]) -> std::path::PathBuf {
        let path = dir.join("housing.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        path
    }

    fn synthetic(n: usize) -> CaliforniaHousing {
        let features = Array2::from_shape_fn((n, 8), |(i, j)| (i * 8 + j) as f64);
        let target = Array1::from_shape_fn(n, |i| i as f64);
        CaliforniaHousing::from_arrays(
            features,
            target,
            FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_load_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            &[
                "8.3252,41,6.98,1.02,322,2.55,37.88,-122.23,4.526",
                "8.3014,21,6.24,0.97,2401,2.11,37.86,-122.22,3.585",
            ],
        );

        let data = CaliforniaHousing::load(&path).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.n_features(), 8);
        assert_eq!(data.feature_names().to_vec(), FEATURE_NAMES.to_vec());
        assert_eq!(data.features()[[1, 4]], 2401.0);
        assert_eq!(data.target()[0], 4.526);
    }

    #[test]
    fn test_load_reports_bad_cell_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            &[
                "8.3252,41,6.98,1.02,322,2.55,37.88,-122.23,4.526",
                "8.3014,n/a,6.24,0.97,2401,2.11,37.86,-122.22,3.585",
            ],
        );

        let err = CaliforniaHousing::load(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 3"), "{}", msg);
        assert!(msg.contains("HouseAge"), "{}", msg);
    }

    #[test]
    fn test_load_rejects_wrong_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "a,b,c\n1,2,3\n").unwrap();
        assert!(matches!(
            CaliforniaHousing::load(&path),
            Err(PipelineError::DatasetError(_))
        ));
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), &[]);
        assert!(matches!(
            CaliforniaHousing::load(&path),
            Err(PipelineError::EmptyData(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_without_url_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = CaliforniaHousing::fetch(dir.path().join("absent.csv"), None).await;
        assert!(matches!(result, Err(PipelineError::DatasetError(_))));
    }

    #[tokio::test]
    async fn test_fetch_uses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), &["1,2,3,4,5,6,7,8,9"]);
        let data = CaliforniaHousing::fetch(&path, Some("http://unused.invalid/data.csv"))
            .await
            .unwrap();
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_split_sizes() {
        let data = synthetic(101);
        let (train, test) = data.train_test_split(0.2, 42).unwrap();
        // ceil(101 * 0.2) = 21
        assert_eq!(test.len(), 21);
        assert_eq!(train.len(), 80);
    }

    #[test]
    fn test_split_is_reproducible_and_disjoint() {
        let data = synthetic(50);
        let (train_a, test_a) = data.train_test_split(0.2, 42).unwrap();
        let (_, test_b) = data.train_test_split(0.2, 42).unwrap();
        assert_eq!(test_a.target(), test_b.target());

        let mut all: Vec<f64> = train_a
            .target()
            .iter()
            .chain(test_a.target().iter())
            .copied()
            .collect();
        all.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(all, (0..50).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_rows_stay_aligned() {
        let data = synthetic(20);
        let (train, _) = data.train_test_split(0.25, 7).unwrap();
        for (row, &y) in train.features().outer_iter().zip(train.target().iter()) {
            assert_eq!(row[0], y * 8.0);
        }
    }

    #[test]
    fn test_split_rejects_bad_test_size() {
        let data = synthetic(10);
        for bad in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                data.train_test_split(bad, 42),
                Err(PipelineError::InvalidParameter(_))
            ));
        }
    }
}
