//! Model checkpoint: the three memories a classifier needs
//!
//! A checkpoint directory holds `associative_memory.mem`,
//! `continuous_memory.mem` and `level_memory.mem` (the channel memory).

use crate::encoder::Encoder;
use crate::error::{HdvrError, Result};
use crate::hdc::{HyperVector, SeedingStrategy, DEFAULT_DIMENSION};
use crate::memory::{AssociativeMemory, ChannelMemory, ContinuousItemMemory};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const ASSOCIATIVE_MEMORY_FILE: &str = "associative_memory.mem";
pub const CONTINUOUS_MEMORY_FILE: &str = "continuous_memory.mem";
pub const CHANNEL_MEMORY_FILE: &str = "level_memory.mem";

/// Shape of a model
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Length of the continuous item memory chain
    pub levels: usize,
    /// Hypervector dimension
    pub dimension: usize,
    /// Number of feature channels
    pub features: usize,
    pub seeding: SeedingStrategy,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            levels: 10,
            dimension: DEFAULT_DIMENSION,
            features: 617,
            seeding: SeedingStrategy::Polar,
        }
    }
}

impl ModelParams {
    pub fn validate(&self) -> Result<()> {
        if self.levels == 0 {
            return Err(HdvrError::InvalidParameter(
                "levels must be at least 1".to_string(),
            ));
        }
        if self.dimension == 0 {
            return Err(HdvrError::InvalidParameter(
                "dimension must be at least 1".to_string(),
            ));
        }
        if self.features == 0 {
            return Err(HdvrError::InvalidParameter(
                "features must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Continuous item memory, channel memory and class prototypes
#[derive(Clone, Debug, PartialEq)]
pub struct Model<V> {
    params: ModelParams,
    continuous: ContinuousItemMemory<V>,
    channels: ChannelMemory<V>,
    associative: AssociativeMemory<V>,
}

impl<V: HyperVector> Model<V> {
    /// Generates fresh item and channel memories and an empty associative
    /// memory
    pub fn new<R: Rng + ?Sized>(params: ModelParams, rng: &mut R) -> Result<Self> {
        params.validate()?;
        let continuous =
            ContinuousItemMemory::generate(params.levels, params.dimension, params.seeding, rng)?;
        let channels =
            ChannelMemory::generate(params.features, params.dimension, params.seeding, rng)?;

        Ok(Self {
            params,
            continuous,
            channels,
            associative: AssociativeMemory::new(params.dimension),
        })
    }

    /// Replaces the model with the checkpoint in `dir`
    ///
    /// If any file is missing or malformed, or its shape disagrees with the
    /// model parameters, the model is regenerated untrained and `false` is
    /// returned. Nothing is partially loaded.
    pub fn load<R: Rng + ?Sized>(&mut self, dir: impl AsRef<Path>, rng: &mut R) -> Result<bool> {
        let dir = dir.as_ref();
        match self.read_checkpoint(dir) {
            Ok(()) => {
                tracing::info!(
                    "Loaded model from {} with {} classes",
                    dir.display(),
                    self.associative.len()
                );
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("No model could be loaded from {}: {}", dir.display(), e);
                *self = Self::new(self.params, rng)?;
                Ok(false)
            }
        }
    }

    fn read_checkpoint(&mut self, dir: &Path) -> Result<()> {
        let dimension = self.params.dimension;
        let associative = AssociativeMemory::open(dir.join(ASSOCIATIVE_MEMORY_FILE), dimension)?;
        let continuous = ContinuousItemMemory::open(dir.join(CONTINUOUS_MEMORY_FILE), dimension)?;
        let channels = ChannelMemory::open(dir.join(CHANNEL_MEMORY_FILE), dimension)?;

        if continuous.len() != self.params.levels {
            return Err(HdvrError::InvalidParameter(format!(
                "checkpoint has {} levels, expected {}",
                continuous.len(),
                self.params.levels
            )));
        }
        if channels.len() != self.params.features {
            return Err(HdvrError::InvalidParameter(format!(
                "checkpoint has {} channels, expected {}",
                channels.len(),
                self.params.features
            )));
        }

        self.associative = associative;
        self.continuous = continuous;
        self.channels = channels;
        Ok(())
    }

    /// Writes the checkpoint into `dir`, creating it if needed
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        self.associative.save(dir.join(ASSOCIATIVE_MEMORY_FILE))?;
        self.continuous.save(dir.join(CONTINUOUS_MEMORY_FILE))?;
        self.channels.save(dir.join(CHANNEL_MEMORY_FILE))?;
        tracing::info!("Saved model to {}", dir.display());
        Ok(())
    }

    /// True while no class prototypes exist
    pub fn is_untrained(&self) -> bool {
        self.associative.is_empty()
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub fn encoder(&self) -> Encoder<'_, V> {
        Encoder::new(&self.channels, &self.continuous)
    }

    pub fn continuous(&self) -> &ContinuousItemMemory<V> {
        &self.continuous
    }

    pub fn channels(&self) -> &ChannelMemory<V> {
        &self.channels
    }

    pub fn associative(&self) -> &AssociativeMemory<V> {
        &self.associative
    }

    pub fn associative_mut(&mut self) -> &mut AssociativeMemory<V> {
        &mut self.associative
    }
}
