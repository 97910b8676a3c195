//! Error types for HDVR

use crate::hdc::HdcError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for HDVR operations
pub type Result<T> = std::result::Result<T, HdvrError>;

/// Main error type for HDVR
#[derive(Error, Debug)]
pub enum HdvrError {
    /// Hypervector algebra error
    #[error("HDC error: {0}")]
    Hdc(#[from] HdcError),

    /// Continuous input value outside the encodable interval
    #[error("Frequency of {value} is outside expected range of [{min}, {max}]")]
    OutOfRange { value: f32, min: f32, max: f32 },

    /// Nearest-neighbour search on an associative memory without prototypes
    #[error("Failed to find query in empty associative memory")]
    EmptyMemory,

    /// Training requested without both datasets populated
    #[error("Could not train model: training and testing datasets must both be loaded")]
    NotTrainable,

    /// A sample label has no prototype in the associative memory
    #[error("Label {0} has no prototype in the associative memory")]
    UnknownLabel(usize),

    /// Labels seen at configuration are not contiguous
    #[error("Labels must be contiguous from 0: no samples for class {0}")]
    MissingClass(usize),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Data and label files disagree in length
    #[error("Mismatching amount of data ({data}) and labels ({labels})")]
    DatasetMismatch { data: usize, labels: usize },

    /// Dataset file pair contains no rows
    #[error("Loaded dataset at {} but it is empty", .0.display())]
    EmptyDataset(PathBuf),

    /// Missing file
    #[error("The path '{}' does not lead to a file", .0.display())]
    FileNotFound(PathBuf),

    /// Malformed line in a data or label file
    #[error("Parse error in {} line {line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// CSV reader or writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HdvrError {
    /// True for errors caused by a missing file
    pub fn is_not_found(&self) -> bool {
        matches!(self, HdvrError::FileNotFound(_))
    }
}
