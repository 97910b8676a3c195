//! Distance helpers over candidate sets

use super::vector::{HdcError, HyperVector};

/// Computes distances of query against all candidates
///
/// # Example
///
/// ```rust
/// use hdvr_core::hdc::{batch_distances, DenseVector};
///
/// let query = DenseVector::from_vec(vec![1, 1]);
/// let candidates = vec![
///     DenseVector::from_vec(vec![1, 1]),
///     DenseVector::from_vec(vec![-1, -1]),
/// ];
///
/// let d = batch_distances(&query, &candidates).unwrap();
/// assert_eq!(d.len(), 2);
/// assert_eq!(d[0], 0.0);
/// ```
pub fn batch_distances<V: HyperVector>(query: &V, candidates: &[V]) -> Result<Vec<f32>, HdcError> {
    candidates.iter().map(|c| query.distance(c)).collect()
}

/// Linear scan for the candidate with the strictly smallest distance
///
/// Ties keep the earliest index. Returns `Ok(None)` for an empty set.
pub fn nearest<'a, V, I>(query: &V, candidates: I) -> Result<Option<(usize, f32)>, HdcError>
where
    V: HyperVector + 'a,
    I: IntoIterator<Item = &'a V>,
{
    let mut best: Option<(usize, f32)> = None;
    for (idx, candidate) in candidates.into_iter().enumerate() {
        let distance = query.distance(candidate)?;
        match best {
            Some((_, min)) if distance >= min => {}
            _ => best = Some((idx, distance)),
        }
    }
    Ok(best)
}

/// Pairwise distance matrix
///
/// Returns NxN matrix where result\[i\]\[j\] = distance(vectors\[i\], vectors\[j\])
pub fn pairwise_distances<V: HyperVector>(vectors: &[V]) -> Result<Vec<Vec<f32>>, HdcError> {
    let n = vectors.len();
    let mut matrix = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let d = vectors[i].distance(&vectors[j])?;
            matrix[i][j] = d;
            matrix[j][i] = d;
        }
    }

    Ok(matrix)
}
