//! Hyperdimensional Computing (HDC) module
//!
//! Two hypervector representations behind the [`HyperVector`] trait:
//! [`DenseVector`] (signed integers, cosine distance) and [`BinaryVector`]
//! (packed bits, normalised Hamming distance).

mod binary;
mod dense;
mod ops;
mod similarity;
mod vector;

pub use binary::BinaryVector;
pub use dense::DenseVector;
pub use ops::{bind, bind_multiple, bundle, bundle_pair, invert, subtract};
pub use similarity::{batch_distances, nearest, pairwise_distances};
pub use vector::{HdcError, HyperVector, Representation, SeedingStrategy};

/// Default hypervector dimension
pub const DEFAULT_DIMENSION: usize = 10_000;
