//! Channel memory: independent role vectors, one per input feature

use super::MemoryStore;
use crate::error::Result;
use crate::hdc::{HyperVector, SeedingStrategy};
use rand::Rng;
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// `F` independently seeded role vectors
///
/// Vector `i` marks feature channel `i` when it is bound to the item vector
/// holding that channel's value.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelMemory<V> {
    store: MemoryStore<V>,
}

impl<V: HyperVector> ChannelMemory<V> {
    pub fn generate<R: Rng + ?Sized>(
        channels: usize,
        dimension: usize,
        strategy: SeedingStrategy,
        rng: &mut R,
    ) -> Result<Self> {
        let mut store = MemoryStore::new(dimension);
        for _ in 0..channels {
            store.push(V::seeded(dimension, strategy, rng)?)?;
        }
        Ok(Self { store })
    }

    pub fn open(path: impl AsRef<Path>, dimension: usize) -> Result<Self> {
        Ok(Self {
            store: MemoryStore::open(path, dimension)?,
        })
    }

    pub fn into_inner(self) -> MemoryStore<V> {
        self.store
    }
}

impl<V> Deref for ChannelMemory<V> {
    type Target = MemoryStore<V>;

    fn deref(&self) -> &MemoryStore<V> {
        &self.store
    }
}

impl<V> DerefMut for ChannelMemory<V> {
    fn deref_mut(&mut self) -> &mut MemoryStore<V> {
        &mut self.store
    }
}
