//! Hypervector capability set shared by the dense and binary representations

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error types for HDC operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HdcError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Length mismatch while decoding: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Inverting vector failed because start >= end ({start} >= {end})")]
    InvalidRange { start: usize, end: usize },

    #[error("Index {index} out of bounds for hypervector of dimension {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Empty vector set provided")]
    EmptyVectorSet,

    #[error("Cannot seed this representation with strategy {0}")]
    UnsupportedSeeding(SeedingStrategy),

    #[error("Dropout probability must be within [0, 1], got {0}")]
    InvalidProbability(f32),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Policy used to fill an unconditioned hypervector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedingStrategy {
    /// Zero / default initialised
    #[default]
    None,
    /// Uniform random bit per position
    Binary,
    /// Uniform choice of +1 / -1 per position
    Polar,
    /// Full-range uniform integer per position
    Random,
}

impl fmt::Display for SeedingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeedingStrategy::None => "NONE",
            SeedingStrategy::Binary => "BINARY",
            SeedingStrategy::Polar => "POLAR",
            SeedingStrategy::Random => "RANDOM",
        };
        f.write_str(name)
    }
}

impl FromStr for SeedingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(SeedingStrategy::None),
            "binary" => Ok(SeedingStrategy::Binary),
            "polar" => Ok(SeedingStrategy::Polar),
            "random" => Ok(SeedingStrategy::Random),
            other => Err(format!("unknown seeding strategy '{}'", other)),
        }
    }
}

/// Representation tag of a hypervector type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Signed integer elements, see [`DenseVector`](super::DenseVector)
    #[default]
    Dense,
    /// Packed bits, see [`BinaryVector`](super::BinaryVector)
    Binary,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Dense => f.write_str("dense"),
            Representation::Binary => f.write_str("binary"),
        }
    }
}

impl FromStr for Representation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dense" | "bipolar" => Ok(Representation::Dense),
            "binary" => Ok(Representation::Binary),
            other => Err(format!("unknown representation '{}'", other)),
        }
    }
}

/// Operations every hypervector representation provides
///
/// Only two implementations exist: [`DenseVector`](super::DenseVector) and
/// [`BinaryVector`](super::BinaryVector). Memories and the trainer are generic
/// over this trait, so the representation is chosen once at the top level.
///
/// All binary operations require both operands to share one dimension and fail
/// with [`HdcError::DimensionMismatch`] otherwise.
///
/// # Example
///
/// ```rust
/// use hdvr_core::hdc::{BinaryVector, HyperVector, SeedingStrategy};
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let a = BinaryVector::seeded(1024, SeedingStrategy::Binary, &mut rng).unwrap();
/// let b = BinaryVector::seeded(1024, SeedingStrategy::Binary, &mut rng).unwrap();
///
/// let bound = a.bind(&b).unwrap();
/// assert_eq!(bound.bind(&b).unwrap(), a);
/// assert_eq!(a.distance(&a).unwrap(), 0.0);
/// ```
pub trait HyperVector: Clone + PartialEq + fmt::Debug + Send + Sync + Sized {
    /// Value stored at one position
    type Element: Copy + fmt::Debug;

    /// Representation tag of this type
    const REPRESENTATION: Representation;

    /// All-zero vector of the given dimension
    fn zeros(dimension: usize) -> Self;

    /// Builds a fresh vector with the given seeding strategy
    fn seeded<R: Rng + ?Sized>(
        dimension: usize,
        strategy: SeedingStrategy,
        rng: &mut R,
    ) -> Result<Self, HdcError>;

    /// Number of positions (D)
    fn dimension(&self) -> usize;

    /// Alias of [`dimension`](Self::dimension)
    #[inline]
    fn size(&self) -> usize {
        self.dimension()
    }

    fn get(&self, index: usize) -> Option<Self::Element>;

    fn set(&mut self, index: usize, value: Self::Element) -> Result<(), HdcError>;

    /// Distance in `[0, ..]`, zero for identical vectors
    fn distance(&self, other: &Self) -> Result<f32, HdcError>;

    /// Inverts the positions in `[start, end)`
    fn invert_range(&mut self, start: usize, end: usize) -> Result<&mut Self, HdcError>;

    /// Inverts every position
    fn invert(&mut self) -> Result<&mut Self, HdcError> {
        let end = self.dimension();
        self.invert_range(0, end)
    }

    fn bind(&self, other: &Self) -> Result<Self, HdcError>;

    /// Binds a whole list in sequence
    fn bind_all(vectors: &[Self]) -> Result<Self, HdcError>;

    /// Superposes a list of vectors into one vector similar to all inputs
    fn bundle(vectors: &[Self]) -> Result<Self, HdcError>;

    /// Two-argument bundle used by prototype corrections
    fn bundle_pair(&self, other: &Self) -> Result<Self, HdcError>;

    /// Removes `other` from `self` (difference or masking)
    fn subtract(&self, other: &Self) -> Result<Self, HdcError>;

    /// Canonical single-line text form
    fn encode(&self) -> Result<String, HdcError>;

    /// Parses the canonical text form, checking the expected dimension
    fn decode(text: &str, dimension: usize) -> Result<Self, HdcError>;
}

#[inline]
pub(crate) fn check_dimensions(expected: usize, actual: usize) -> Result<(), HdcError> {
    if expected != actual {
        return Err(HdcError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

#[inline]
pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<(), HdcError> {
    if start >= end {
        return Err(HdcError::InvalidRange { start, end });
    }
    if end > len {
        return Err(HdcError::IndexOutOfBounds { index: end - 1, len });
    }
    Ok(())
}

/// Checks that a non-empty list shares one dimension and returns it
pub(crate) fn common_dimension<V: HyperVector>(vectors: &[V]) -> Result<usize, HdcError> {
    let first = vectors.first().ok_or(HdcError::EmptyVectorSet)?;
    let dimension = first.dimension();
    for v in &vectors[1..] {
        check_dimensions(dimension, v.dimension())?;
    }
    Ok(dimension)
}
