//! Ordered hypervector store with line-oriented persistence

use crate::error::{HdvrError, Result};
use crate::hdc::{HdcError, HyperVector};
use std::fs;
use std::io;
use std::ops::{Index, IndexMut};
use std::path::Path;

/// Reads a whole file, reporting a missing path as [`HdvrError::FileNotFound`]
pub(crate) fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => HdvrError::FileNotFound(path.to_path_buf()),
        _ => HdvrError::Io(e),
    })
}

/// Writes `lines` newline-terminated
pub(crate) fn write_lines<I, S>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

/// Non-blank lines with their 1-based line numbers
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

/// Ordered, indexable collection of hypervectors sharing one dimension
///
/// Insertion order is identity: an element's index is its symbol id.
///
/// # Example
///
/// ```rust
/// use hdvr_core::hdc::{DenseVector, HyperVector};
/// use hdvr_core::memory::MemoryStore;
///
/// let mut store = MemoryStore::new(3);
/// store.push(DenseVector::from_vec(vec![1, -1, 1])).unwrap();
/// store.push(DenseVector::zeros(3)).unwrap();
///
/// assert_eq!(store.len(), 2);
/// assert_eq!(store[0].as_slice(), &[1, -1, 1]);
/// assert!(store.push(DenseVector::zeros(4)).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryStore<V> {
    dimension: usize,
    vectors: Vec<V>,
}

impl<V: HyperVector> MemoryStore<V> {
    /// Creates an empty store for vectors of `dimension` positions
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    /// Wraps existing vectors, checking every dimension
    pub fn from_vectors(dimension: usize, vectors: Vec<V>) -> Result<Self> {
        for v in &vectors {
            check(dimension, v)?;
        }
        Ok(Self { dimension, vectors })
    }

    /// Creates a store and fills it from `path`
    pub fn open(path: impl AsRef<Path>, dimension: usize) -> Result<Self> {
        let mut store = Self::new(dimension);
        store.load(path)?;
        Ok(store)
    }

    /// Replaces the contents with the vectors stored at `path`
    ///
    /// The store is left untouched if any line fails to decode.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = read_file(path)?;
        let vectors = content_lines(&text)
            .map(|(line, content)| {
                V::decode(content, self.dimension).map_err(|e| HdvrError::Parse {
                    path: path.to_path_buf(),
                    line,
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!("Loaded {} vectors from {}", vectors.len(), path.display());
        self.vectors = vectors;
        Ok(())
    }

    /// Writes one canonical encoding per line
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let lines = self
            .vectors
            .iter()
            .map(|v| v.encode())
            .collect::<std::result::Result<Vec<_>, HdcError>>()?;
        write_lines(path.as_ref(), lines)
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&V> {
        self.vectors.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut V> {
        self.vectors.get_mut(index)
    }

    /// Appends a vector and returns its index
    pub fn push(&mut self, vector: V) -> Result<usize> {
        check(self.dimension, &vector)?;
        self.vectors.push(vector);
        Ok(self.vectors.len() - 1)
    }

    /// Replaces the vector at `index` in place, returning the previous one
    pub fn replace(&mut self, index: usize, vector: V) -> Result<V> {
        check(self.dimension, &vector)?;
        let len = self.vectors.len();
        let slot = self
            .vectors
            .get_mut(index)
            .ok_or(HdcError::IndexOutOfBounds { index, len })?;
        Ok(std::mem::replace(slot, vector))
    }

    pub fn clear(&mut self) {
        self.vectors.clear();
    }

    /// Iterates in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.vectors.iter()
    }

    pub fn as_slice(&self) -> &[V] {
        &self.vectors
    }
}

fn check<V: HyperVector>(dimension: usize, vector: &V) -> Result<()> {
    if vector.dimension() != dimension {
        return Err(HdcError::DimensionMismatch {
            expected: dimension,
            actual: vector.dimension(),
        }
        .into());
    }
    Ok(())
}

impl<V> Index<usize> for MemoryStore<V> {
    type Output = V;

    fn index(&self, index: usize) -> &V {
        &self.vectors[index]
    }
}

impl<V> IndexMut<usize> for MemoryStore<V> {
    fn index_mut(&mut self, index: usize) -> &mut V {
        &mut self.vectors[index]
    }
}

impl<'a, V> IntoIterator for &'a MemoryStore<V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.vectors.iter()
    }
}
