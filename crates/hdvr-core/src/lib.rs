//! # HDVR Core
//!
//! Hyperdimensional computing (HDC) classification:
//! - Dense (signed integer) and binary (packed bit) hypervectors behind one
//!   [`HyperVector`] trait
//! - Continuous item memory, channel memory and associative memory
//! - Feature encoding, prototype configuration and error-driven training
//!
//! ## HDC Module
//!
//! ### Example
//!
//! ```rust
//! use hdvr_core::hdc::{DenseVector, HyperVector};
//!
//! let a = DenseVector::from_vec(vec![1, 1, -1, -1]);
//! let b = DenseVector::from_vec(vec![1, -1, 1, -1]);
//!
//! // Bind by element-wise multiplication
//! let bound = a.bind(&b).unwrap();
//! assert_eq!(bound.as_slice(), &[1, -1, -1, 1]);
//!
//! // Cosine distance, 0 for identical vectors
//! assert_eq!(a.distance(&a).unwrap(), 0.0);
//! ```
//!
//! ## Training
//!
//! A [`Model`] holds the memories; a [`Trainer`] encodes datasets with the
//! model, configures one prototype per class and corrects them epoch by
//! epoch.
//!
//! ### Example
//!
//! ```rust
//! use hdvr_core::{Dataset, DenseVector, Model, ModelParams, SeedingStrategy, Trainer};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let params = ModelParams { levels: 10, dimension: 2048, features: 4, seeding: SeedingStrategy::Polar };
//! let model: Model<DenseVector> = Model::new(params, &mut rng).unwrap();
//!
//! let mut raw = Dataset::new();
//! raw.push(vec![-0.9, -0.8, -0.9, -0.7], 0);
//! raw.push(vec![0.9, 0.8, 0.9, 0.7], 1);
//!
//! let encoded = model.encoder().encode_dataset(&raw).unwrap();
//! let mut trainer = Trainer::new(model);
//! trainer.set_datasets(encoded.clone(), encoded);
//!
//! let metrics = trainer.train(2).unwrap();
//! assert_eq!(metrics.entries().len(), 3);
//! assert_eq!(metrics.last().unwrap().accuracy, 100.0);
//! ```

pub mod dataset;
pub mod encoder;
pub mod error;
pub mod hdc;
pub mod memory;
pub mod metrics;
pub mod model;
pub mod trainer;

pub use dataset::{Dataset, DatasetSource, DirectorySource, RawDataset, Sample, Split};
pub use encoder::{frequency_bin, Encoder, MAX_FREQUENCY, MIN_FREQUENCY};
pub use error::{HdvrError, Result};
pub use hdc::{
    BinaryVector, DenseVector, HdcError, HyperVector, Representation, SeedingStrategy,
    DEFAULT_DIMENSION,
};
pub use memory::{AssociativeMemory, ChannelMemory, ContinuousItemMemory, MemoryStore};
pub use metrics::{CsvMetricsSink, Metrics, MetricsSink, TrainingMetric};
pub use model::{Model, ModelParams};
pub use trainer::{Trainer, TrainerState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        let params = ModelParams::default();
        assert_eq!(params.dimension, DEFAULT_DIMENSION);
        assert_eq!(frequency_bin(MAX_FREQUENCY, params.levels).unwrap(), 9);
        assert_eq!(Representation::default(), Representation::Dense);
    }
}
