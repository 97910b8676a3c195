//! Continuous item memory: a similarity-graded chain of hypervectors

use super::MemoryStore;
use crate::error::{HdvrError, Result};
use crate::hdc::{HyperVector, SeedingStrategy};
use rand::Rng;
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// Ordered chain of `L` vectors encoding a discretised continuum
///
/// Item 0 is freshly seeded. Item `i` is item `i - 1` with the next
/// `chunk = D / (L - 1)` positions inverted, so the inverted ranges walk
/// across the vector and the distance between two items grows with the
/// distance between their indices. When `D` is not divisible by `L - 1` the
/// trailing `D mod (L - 1)` positions are never flipped.
///
/// # Example
///
/// ```rust
/// use hdvr_core::hdc::{BinaryVector, HyperVector, SeedingStrategy};
/// use hdvr_core::memory::ContinuousItemMemory;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let chain: ContinuousItemMemory<BinaryVector> =
///     ContinuousItemMemory::generate(5, 1000, SeedingStrategy::Binary, &mut rng).unwrap();
///
/// assert_eq!(chain.len(), 5);
/// let near = chain[0].distance(&chain[1]).unwrap();
/// let far = chain[0].distance(&chain[4]).unwrap();
/// assert!(near < far);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ContinuousItemMemory<V> {
    store: MemoryStore<V>,
}

impl<V: HyperVector> ContinuousItemMemory<V> {
    /// Generates a chain of `levels` vectors of `dimension` positions
    pub fn generate<R: Rng + ?Sized>(
        levels: usize,
        dimension: usize,
        strategy: SeedingStrategy,
        rng: &mut R,
    ) -> Result<Self> {
        if levels == 0 {
            return Err(HdvrError::InvalidParameter(
                "continuous item memory needs at least one level".to_string(),
            ));
        }

        let mut store = MemoryStore::new(dimension);
        store.push(V::seeded(dimension, strategy, rng)?)?;
        if levels == 1 {
            return Ok(Self { store });
        }

        let chunk = dimension / (levels - 1);
        if chunk <= 1 {
            tracing::warn!(
                chunk,
                dimension,
                levels,
                "continuous memory chunk size causes no distinct bit-flips; chain is degenerate"
            );
        }

        let mut start = 0;
        for i in 1..levels {
            let mut next = store[i - 1].clone();
            if chunk > 0 {
                next.invert_range(start, start + chunk)?;
            }
            start += chunk;
            store.push(next)?;
        }

        Ok(Self { store })
    }

    /// Reloads a persisted chain
    pub fn open(path: impl AsRef<Path>, dimension: usize) -> Result<Self> {
        Ok(Self {
            store: MemoryStore::open(path, dimension)?,
        })
    }

    /// Number of positions flipped between consecutive items
    pub fn chunk_size(&self) -> usize {
        match self.store.len() {
            0 | 1 => 0,
            n => self.store.dimension() / (n - 1),
        }
    }

    pub fn into_inner(self) -> MemoryStore<V> {
        self.store
    }
}

impl<V> Deref for ContinuousItemMemory<V> {
    type Target = MemoryStore<V>;

    fn deref(&self) -> &MemoryStore<V> {
        &self.store
    }
}

impl<V> DerefMut for ContinuousItemMemory<V> {
    fn deref_mut(&mut self) -> &mut MemoryStore<V> {
        &mut self.store
    }
}
