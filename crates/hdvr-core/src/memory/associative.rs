//! Associative memory for hyperdimensional classification
//!
//! Stores one prototype hypervector per class and answers nearest-prototype
//! queries.

use super::MemoryStore;
use crate::error::{HdvrError, Result};
use crate::hdc::{nearest, HyperVector};
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// Class prototypes indexed by label
///
/// # Performance
///
/// - Insert: O(1)
/// - Find: O(C·D) where C is the number of classes
///
/// # Example
///
/// ```rust
/// use hdvr_core::hdc::DenseVector;
/// use hdvr_core::memory::AssociativeMemory;
///
/// let mut memory = AssociativeMemory::new(4);
/// memory.insert(DenseVector::from_vec(vec![1, 1, 1, 1])).unwrap();
/// memory.insert(DenseVector::from_vec(vec![1, -1, 1, -1])).unwrap();
///
/// let query = DenseVector::from_vec(vec![1, -1, 1, 1]);
/// assert_eq!(memory.find(&query).unwrap(), 1);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AssociativeMemory<V> {
    store: MemoryStore<V>,
}

impl<V: HyperVector> AssociativeMemory<V> {
    /// Creates a new empty associative memory
    pub fn new(dimension: usize) -> Self {
        Self {
            store: MemoryStore::new(dimension),
        }
    }

    pub fn open(path: impl AsRef<Path>, dimension: usize) -> Result<Self> {
        Ok(Self {
            store: MemoryStore::open(path, dimension)?,
        })
    }

    /// Appends a class prototype; its index is the class label
    pub fn insert(&mut self, prototype: V) -> Result<usize> {
        self.store.push(prototype)
    }

    /// Label of the prototype nearest to `query`
    ///
    /// Strict minimum over a linear scan; ties keep the earliest label.
    pub fn find(&self, query: &V) -> Result<usize> {
        self.find_with_distance(query).map(|(label, _)| label)
    }

    /// Like [`find`](Self::find), also returning the winning distance
    pub fn find_with_distance(&self, query: &V) -> Result<(usize, f32)> {
        nearest(query, self.store.iter())?.ok_or(HdvrError::EmptyMemory)
    }

    pub fn into_inner(self) -> MemoryStore<V> {
        self.store
    }
}

impl<V> Deref for AssociativeMemory<V> {
    type Target = MemoryStore<V>;

    fn deref(&self) -> &MemoryStore<V> {
        &self.store
    }
}

impl<V> DerefMut for AssociativeMemory<V> {
    fn deref_mut(&mut self) -> &mut MemoryStore<V> {
        &mut self.store
    }
}
