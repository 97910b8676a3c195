//! Labelled datasets and their two-file storage format
//!
//! A dataset is stored as a data file and a labels file whose lines pair up
//! one-to-one. Raw datasets keep comma-separated feature values in `.csv`
//! files; encoded datasets keep one canonical hypervector per line in
//! `.datmem` files.

use crate::error::{HdvrError, Result};
use crate::hdc::HyperVector;
use crate::memory::{content_lines, read_file, write_lines};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of raw feature datasets
pub const RAW_EXTENSION: &str = "csv";

/// Extension of encoded hypervector datasets
pub const ENCODED_EXTENSION: &str = "datmem";

/// One feature record and its class label
#[derive(Clone, Debug, PartialEq)]
pub struct Sample<X> {
    pub features: X,
    pub label: usize,
}

impl<X> Sample<X> {
    pub fn new(features: X, label: usize) -> Self {
        Self { features, label }
    }
}

/// Ordered sequence of labelled samples
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset<X> {
    samples: Vec<Sample<X>>,
}

/// Dataset of raw feature vectors
pub type RawDataset = Dataset<Vec<f32>>;

impl<X> Default for Dataset<X> {
    fn default() -> Self {
        Self {
            samples: Vec::new(),
        }
    }
}

impl<X> Dataset<X> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    pub fn from_samples(samples: Vec<Sample<X>>) -> Self {
        Self { samples }
    }

    pub fn push(&mut self, features: X, label: usize) {
        self.samples.push(Sample::new(features, label));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Sample<X>> {
        self.samples.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample<X>> {
        self.samples.iter()
    }

    pub fn samples(&self) -> &[Sample<X>] {
        &self.samples
    }

    /// Distinct labels in ascending order
    pub fn class_set(&self) -> BTreeSet<usize> {
        self.samples.iter().map(|s| s.label).collect()
    }

    /// Loads a dataset from a data file and a labels file
    ///
    /// `parse` decodes one data line. Blank lines are ignored in both files.
    /// The two files must hold the same number of records, and at least one.
    pub fn load_with<F>(data_path: &Path, labels_path: &Path, parse: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<X, String>,
    {
        let data_text = read_file(data_path)?;
        let data = content_lines(&data_text)
            .map(|(line, content)| {
                parse(content).map_err(|message| HdvrError::Parse {
                    path: data_path.to_path_buf(),
                    line,
                    message,
                })
            })
            .collect::<Result<Vec<X>>>()?;

        Self::from_columns(data_path, data, read_labels(labels_path)?)
    }

    /// Pairs loaded records with their labels
    fn from_columns(data_path: &Path, data: Vec<X>, labels: Vec<usize>) -> Result<Self> {
        if data.len() != labels.len() {
            return Err(HdvrError::DatasetMismatch {
                data: data.len(),
                labels: labels.len(),
            });
        }
        if data.is_empty() {
            return Err(HdvrError::EmptyDataset(data_path.to_path_buf()));
        }

        Ok(Self {
            samples: data
                .into_iter()
                .zip(labels)
                .map(|(features, label)| Sample::new(features, label))
                .collect(),
        })
    }

    /// Writes the data and labels files, formatting each record with `format`
    pub fn save_with<F>(&self, data_path: &Path, labels_path: &Path, format: F) -> Result<()>
    where
        F: Fn(&X) -> Result<String>,
    {
        let data = self
            .samples
            .iter()
            .map(|s| format(&s.features))
            .collect::<Result<Vec<_>>>()?;
        write_lines(data_path, data)?;
        write_lines(labels_path, self.samples.iter().map(|s| s.label.to_string()))
    }
}

impl<X> FromIterator<Sample<X>> for Dataset<X> {
    fn from_iter<I: IntoIterator<Item = Sample<X>>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl<X> IntoIterator for Dataset<X> {
    type Item = Sample<X>;
    type IntoIter = std::vec::IntoIter<Sample<X>>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

impl<'a, X> IntoIterator for &'a Dataset<X> {
    type Item = &'a Sample<X>;
    type IntoIter = std::slice::Iter<'a, Sample<X>>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

impl RawDataset {
    /// Loads comma-separated feature rows and their labels
    pub fn load_csv(data_path: &Path, labels_path: &Path) -> Result<Self> {
        let data = read_features(data_path)?;
        Self::from_columns(data_path, data, read_labels(labels_path)?)
    }
}

/// Reads comma-separated feature rows
///
/// Rows carry no header and must all be as wide as the first one.
pub fn read_features(path: &Path) -> Result<Vec<Vec<f32>>> {
    let text = read_file(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .records()
        .map(|record| -> Result<Vec<f32>> {
            let record = record.map_err(|e| {
                let line = e.position().map_or(0, |p| p.line() as usize);
                parse_error(path, line, e.to_string())
            })?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            record
                .iter()
                .map(|field| {
                    field.parse::<f32>().map_err(|e| {
                        parse_error(path, line, format!("invalid feature value '{}': {}", field, e))
                    })
                })
                .collect()
        })
        .collect()
}

/// Reads one class label per line
pub fn read_labels(path: &Path) -> Result<Vec<usize>> {
    let text = read_file(path)?;
    content_lines(&text)
        .map(|(line, content)| {
            content.parse::<usize>().map_err(|e| {
                parse_error(path, line, format!("invalid label '{}': {}", content, e))
            })
        })
        .collect()
}

fn parse_error(path: &Path, line: usize, message: String) -> HdvrError {
    HdvrError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    }
}

/// Which half of an experiment a dataset belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    /// File name prefix of the split
    pub fn prefix(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

/// Somewhere datasets can be loaded from and encoded datasets cached to
pub trait DatasetSource {
    /// Loads raw feature vectors for `split`
    fn load_raw(&self, split: Split) -> Result<RawDataset>;

    /// Loads previously encoded hypervectors for `split`
    fn load_encoded<V: HyperVector>(&self, split: Split, dimension: usize) -> Result<Dataset<V>>;

    /// Persists encoded hypervectors for `split`
    fn save_encoded<V: HyperVector>(&self, split: Split, dataset: &Dataset<V>) -> Result<()>;
}

/// Dataset files laid out in one directory
///
/// `<root>/train.<ext>`, `<root>/train_labels.<ext>` and the same for `test`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Data and labels paths of `split` with extension `ext`
    pub fn paths(&self, split: Split, ext: &str) -> (PathBuf, PathBuf) {
        let prefix = split.prefix();
        (
            self.root.join(format!("{}.{}", prefix, ext)),
            self.root.join(format!("{}_labels.{}", prefix, ext)),
        )
    }

    /// True when both files of `split` exist
    pub fn contains(&self, split: Split, ext: &str) -> bool {
        let (data, labels) = self.paths(split, ext);
        data.is_file() && labels.is_file()
    }
}

impl DatasetSource for DirectorySource {
    fn load_raw(&self, split: Split) -> Result<RawDataset> {
        let (data, labels) = self.paths(split, RAW_EXTENSION);
        RawDataset::load_csv(&data, &labels)
    }

    fn load_encoded<V: HyperVector>(&self, split: Split, dimension: usize) -> Result<Dataset<V>> {
        let (data, labels) = self.paths(split, ENCODED_EXTENSION);
        Dataset::load_with(&data, &labels, |line| {
            V::decode(line, dimension).map_err(|e| e.to_string())
        })
    }

    fn save_encoded<V: HyperVector>(&self, split: Split, dataset: &Dataset<V>) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let (data, labels) = self.paths(split, ENCODED_EXTENSION);
        tracing::debug!("Saving {} encoded samples to {}", dataset.len(), data.display());
        dataset.save_with(&data, &labels, |v| Ok(v.encode()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hdc::{BinaryVector, DenseVector};
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_push_and_iterate() {
        let mut dataset = Dataset::new();
        dataset.push(vec![0.1, 0.2], 1);
        dataset.push(vec![0.3, 0.4], 0);

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(1).unwrap().label, 0);
        let labels: Vec<_> = dataset.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec![1, 0]);
    }

    #[test]
    fn test_class_set() {
        let dataset: Dataset<u8> = [2, 0, 2, 1]
            .iter()
            .map(|&label| Sample::new(0, label))
            .collect();
        assert_eq!(dataset.class_set().into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_read_features() {
        let dir = tempdir().unwrap();
        write(dir.path(), "rows.csv", "0.5, -1,1\n\n0.25,0,-0.5\n");

        let rows = read_features(&dir.path().join("rows.csv")).unwrap();
        assert_eq!(rows, vec![vec![0.5, -1.0, 1.0], vec![0.25, 0.0, -0.5]]);
    }

    #[test]
    fn test_read_features_bad_value() {
        let dir = tempdir().unwrap();
        write(dir.path(), "rows.csv", "0.5,0.1\n0.5,abc\n");

        let result = read_features(&dir.path().join("rows.csv"));
        assert!(matches!(result, Err(HdvrError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_read_features_short_row() {
        let dir = tempdir().unwrap();
        write(dir.path(), "train.csv", "0.1,0.2,0.3\n0.4,0.5\n");
        write(dir.path(), "train_labels.csv", "0\n1\n");

        let result = DirectorySource::new(dir.path()).load_raw(Split::Train);
        assert!(matches!(result, Err(HdvrError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_split_paths() {
        let source = DirectorySource::new("/data");
        let (data, labels) = source.paths(Split::Test, RAW_EXTENSION);
        assert_eq!(data, PathBuf::from("/data/test.csv"));
        assert_eq!(labels, PathBuf::from("/data/test_labels.csv"));
    }

    #[test]
    fn test_load_raw() {
        let dir = tempdir().unwrap();
        write(dir.path(), "train.csv", "0.1,0.2,0.3\n-0.5,0.0,1.0\n");
        write(dir.path(), "train_labels.csv", "0\n1\n");

        let source = DirectorySource::new(dir.path());
        assert!(source.contains(Split::Train, RAW_EXTENSION));
        assert!(!source.contains(Split::Test, RAW_EXTENSION));

        let dataset = source.load_raw(Split::Train).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(1).unwrap().features, vec![-0.5, 0.0, 1.0]);
        assert_eq!(dataset.get(1).unwrap().label, 1);
    }

    #[test]
    fn test_load_mismatch() {
        let dir = tempdir().unwrap();
        write(dir.path(), "train.csv", "0.1\n0.2\n0.3\n");
        write(dir.path(), "train_labels.csv", "0\n1\n");

        let result = DirectorySource::new(dir.path()).load_raw(Split::Train);
        assert!(matches!(
            result,
            Err(HdvrError::DatasetMismatch { data: 3, labels: 2 })
        ));
    }

    #[test]
    fn test_load_empty() {
        let dir = tempdir().unwrap();
        write(dir.path(), "test.csv", "");
        write(dir.path(), "test_labels.csv", "\n");

        let result = DirectorySource::new(dir.path()).load_raw(Split::Test);
        assert!(matches!(result, Err(HdvrError::EmptyDataset(_))));
    }

    #[test]
    fn test_load_missing_labels() {
        let dir = tempdir().unwrap();
        write(dir.path(), "train.csv", "0.1\n");

        let result = DirectorySource::new(dir.path()).load_raw(Split::Train);
        assert!(matches!(result, Err(HdvrError::FileNotFound(_))));
    }

    #[test]
    fn test_load_bad_label() {
        let dir = tempdir().unwrap();
        write(dir.path(), "train.csv", "0.1\n0.2\n");
        write(dir.path(), "train_labels.csv", "0\n-1\n");

        let result = DirectorySource::new(dir.path()).load_raw(Split::Train);
        assert!(matches!(result, Err(HdvrError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_encoded_cache_dense() {
        let dir = tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("cache"));

        let mut dataset = Dataset::new();
        dataset.push(DenseVector::from_vec(vec![3, -1, 0, 2]), 1);
        dataset.push(DenseVector::from_vec(vec![-4, 4, 1, 1]), 0);
        source.save_encoded(Split::Train, &dataset).unwrap();

        assert!(source.contains(Split::Train, ENCODED_EXTENSION));
        let loaded: Dataset<DenseVector> = source.load_encoded(Split::Train, 4).unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_encoded_cache_binary() {
        let dir = tempdir().unwrap();
        let source = DirectorySource::new(dir.path());

        let mut dataset = Dataset::new();
        dataset.push(BinaryVector::from_bit_str("10110011").unwrap(), 2);
        source.save_encoded(Split::Test, &dataset).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("test.datmem")).unwrap(),
            "b3\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("test_labels.datmem")).unwrap(),
            "2\n"
        );

        let loaded: Dataset<BinaryVector> = source.load_encoded(Split::Test, 8).unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_encoded_wrong_dimension() {
        let dir = tempdir().unwrap();
        let source = DirectorySource::new(dir.path());

        let mut dataset = Dataset::new();
        dataset.push(DenseVector::from_vec(vec![1, 2, 3]), 0);
        source.save_encoded(Split::Train, &dataset).unwrap();

        let result = source.load_encoded::<DenseVector>(Split::Train, 4);
        assert!(matches!(result, Err(HdvrError::Parse { line: 1, .. })));
    }
}
