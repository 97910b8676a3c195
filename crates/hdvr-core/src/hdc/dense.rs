//! Dense (signed integer / bipolar) hypervectors

use super::vector::{check_dimensions, check_range, common_dimension, HdcError, HyperVector};
use super::{Representation, SeedingStrategy};
use rand::distributions::Bernoulli;
use rand::Rng;
use std::fmt;

/// A hypervector of `i32` elements
///
/// Bind is element-wise multiplication, bundle is element-wise addition and
/// inversion is negation. Arithmetic wraps on overflow, which only matters for
/// vectors seeded with [`SeedingStrategy::Random`].
///
/// # Example
///
/// ```rust
/// use hdvr_core::hdc::{DenseVector, HyperVector};
///
/// let a = DenseVector::from_vec(vec![1, 1, -1, -1]);
/// let b = DenseVector::from_vec(vec![1, -1, 1, -1]);
/// assert_eq!(a.bind(&b).unwrap().as_slice(), &[1, -1, -1, 1]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DenseVector {
    data: Vec<i32>,
}

impl DenseVector {
    pub fn from_vec(data: Vec<i32>) -> Self {
        Self { data }
    }

    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.data
    }

    /// Bundles with per-position dropout
    ///
    /// The result starts as a copy of `vectors[0]`. For every position a
    /// Bernoulli(`dropout`) draw decides whether the remaining vectors are
    /// accumulated there; on a hit the position keeps the first vector's value.
    pub fn bundle_with_dropout<R: Rng + ?Sized>(
        vectors: &[Self],
        dropout: f32,
        rng: &mut R,
    ) -> Result<Self, HdcError> {
        common_dimension(vectors)?;
        let skip = dropout_distribution(dropout)?;

        let mut result = vectors[0].clone();
        for (i, value) in result.data.iter_mut().enumerate() {
            if rng.sample(skip) {
                continue;
            }
            for v in &vectors[1..] {
                *value = value.wrapping_add(v.data[i]);
            }
        }
        Ok(result)
    }

    /// Pairwise sum with per-position dropout
    pub fn bundle_pair_with_dropout<R: Rng + ?Sized>(
        &self,
        other: &Self,
        dropout: f32,
        rng: &mut R,
    ) -> Result<Self, HdcError> {
        self.zip_with_dropout(other, dropout, rng, i32::wrapping_add)
    }

    /// Pairwise difference with per-position dropout
    pub fn subtract_with_dropout<R: Rng + ?Sized>(
        &self,
        other: &Self,
        dropout: f32,
        rng: &mut R,
    ) -> Result<Self, HdcError> {
        self.zip_with_dropout(other, dropout, rng, i32::wrapping_sub)
    }

    fn zip_with_dropout<R: Rng + ?Sized>(
        &self,
        other: &Self,
        dropout: f32,
        rng: &mut R,
        op: fn(i32, i32) -> i32,
    ) -> Result<Self, HdcError> {
        check_dimensions(self.dimension(), other.dimension())?;
        let skip = dropout_distribution(dropout)?;

        let mut result = self.clone();
        for (value, &rhs) in result.data.iter_mut().zip(&other.data) {
            if rng.sample(skip) {
                continue;
            }
            *value = op(*value, rhs);
        }
        Ok(result)
    }

    fn zip_with(&self, other: &Self, op: fn(i32, i32) -> i32) -> Result<Self, HdcError> {
        check_dimensions(self.dimension(), other.dimension())?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| op(a, b))
            .collect();
        Ok(Self { data })
    }
}

fn dropout_distribution(dropout: f32) -> Result<Bernoulli, HdcError> {
    Bernoulli::new(dropout as f64).map_err(|_| HdcError::InvalidProbability(dropout))
}

impl HyperVector for DenseVector {
    type Element = i32;

    const REPRESENTATION: Representation = Representation::Dense;

    fn zeros(dimension: usize) -> Self {
        Self {
            data: vec![0; dimension],
        }
    }

    fn seeded<R: Rng + ?Sized>(
        dimension: usize,
        strategy: SeedingStrategy,
        rng: &mut R,
    ) -> Result<Self, HdcError> {
        let data = match strategy {
            SeedingStrategy::None => vec![0; dimension],
            SeedingStrategy::Binary => (0..dimension).map(|_| rng.gen_range(0..=1)).collect(),
            SeedingStrategy::Polar => (0..dimension)
                .map(|_| if rng.gen::<bool>() { 1 } else { -1 })
                .collect(),
            SeedingStrategy::Random => (0..dimension).map(|_| rng.gen::<i32>()).collect(),
        };
        Ok(Self { data })
    }

    #[inline]
    fn dimension(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get(&self, index: usize) -> Option<i32> {
        self.data.get(index).copied()
    }

    fn set(&mut self, index: usize, value: i32) -> Result<(), HdcError> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(HdcError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Cosine distance `1 - cos(a, b)`
    ///
    /// Accumulates in `f64`. A zero-magnitude operand has distance 0 to an
    /// identical vector and 1 to anything else.
    fn distance(&self, other: &Self) -> Result<f32, HdcError> {
        check_dimensions(self.dimension(), other.dimension())?;

        let mut a_dot_b = 0.0f64;
        let mut a_mag = 0.0f64;
        let mut b_mag = 0.0f64;
        for (&a, &b) in self.data.iter().zip(&other.data) {
            let (a, b) = (a as f64, b as f64);
            a_dot_b += a * b;
            a_mag += a * a;
            b_mag += b * b;
        }

        if a_mag == 0.0 || b_mag == 0.0 {
            return Ok(if self == other { 0.0 } else { 1.0 });
        }
        // |a - b|^2 == 0
        if a_dot_b == a_mag && a_dot_b == b_mag {
            return Ok(0.0);
        }

        let distance = 1.0 - a_dot_b / (a_mag * b_mag).sqrt();
        Ok(distance.max(0.0) as f32)
    }

    fn invert_range(&mut self, start: usize, end: usize) -> Result<&mut Self, HdcError> {
        check_range(start, end, self.dimension())?;
        for value in &mut self.data[start..end] {
            *value = value.wrapping_neg();
        }
        Ok(self)
    }

    fn bind(&self, other: &Self) -> Result<Self, HdcError> {
        self.zip_with(other, i32::wrapping_mul)
    }

    fn bind_all(vectors: &[Self]) -> Result<Self, HdcError> {
        common_dimension(vectors)?;
        let mut result = vectors[0].clone();
        for v in &vectors[1..] {
            for (value, &rhs) in result.data.iter_mut().zip(&v.data) {
                *value = value.wrapping_mul(rhs);
            }
        }
        Ok(result)
    }

    /// Element-wise sum of all vectors
    fn bundle(vectors: &[Self]) -> Result<Self, HdcError> {
        common_dimension(vectors)?;
        let mut result = vectors[0].clone();
        for v in &vectors[1..] {
            for (value, &rhs) in result.data.iter_mut().zip(&v.data) {
                *value = value.wrapping_add(rhs);
            }
        }
        Ok(result)
    }

    fn bundle_pair(&self, other: &Self) -> Result<Self, HdcError> {
        self.zip_with(other, i32::wrapping_add)
    }

    fn subtract(&self, other: &Self) -> Result<Self, HdcError> {
        self.zip_with(other, i32::wrapping_sub)
    }

    /// Comma-separated integers
    fn encode(&self) -> Result<String, HdcError> {
        let parts: Vec<String> = self.data.iter().map(|v| v.to_string()).collect();
        Ok(parts.join(","))
    }

    fn decode(text: &str, dimension: usize) -> Result<Self, HdcError> {
        let text = text.trim();
        let data = if text.is_empty() {
            Vec::new()
        } else {
            text.split(',')
                .map(|token| {
                    token
                        .trim()
                        .parse::<i32>()
                        .map_err(|e| HdcError::Parse(format!("'{}': {}", token, e)))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        if data.len() != dimension {
            return Err(HdcError::LengthMismatch {
                expected: dimension,
                actual: data.len(),
            });
        }
        Ok(Self { data })
    }
}

impl From<Vec<i32>> for DenseVector {
    fn from(data: Vec<i32>) -> Self {
        Self::from_vec(data)
    }
}

impl fmt::Debug for DenseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 8;
        let head = &self.data[..self.data.len().min(PREVIEW)];
        write!(f, "DenseVector {{ dim: {}, head: {:?}", self.data.len(), head)?;
        if self.data.len() > PREVIEW {
            write!(f, "..")?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn polar(dim: usize, seed: u64) -> DenseVector {
        let mut rng = StdRng::seed_from_u64(seed);
        DenseVector::seeded(dim, SeedingStrategy::Polar, &mut rng).unwrap()
    }

    #[test]
    fn test_bind_elementwise_product() {
        let a = DenseVector::from_vec(vec![1, 1, -1, -1]);
        let b = DenseVector::from_vec(vec![1, -1, 1, -1]);

        assert_eq!(a.bind(&b).unwrap().as_slice(), &[1, -1, -1, 1]);
    }

    #[test]
    fn test_bind_polar_self_inverse() {
        let a = polar(512, 1);
        let b = polar(512, 2);

        assert_eq!(a.bind(&b).unwrap().bind(&b).unwrap(), a);
    }

    #[test]
    fn test_bind_all_matches_chain() {
        let vs: Vec<_> = (0..3).map(|i| polar(64, i)).collect();
        let chained = vs[0].bind(&vs[1]).unwrap().bind(&vs[2]).unwrap();

        assert_eq!(DenseVector::bind_all(&vs).unwrap(), chained);
    }

    #[test]
    fn test_polar_seeding_values() {
        let v = polar(1000, 3);
        assert!(v.as_slice().iter().all(|&x| x == 1 || x == -1));

        let ones = v.as_slice().iter().filter(|&&x| x == 1).count();
        assert!(ones > 400 && ones < 600, "ones: {}", ones);
    }

    #[test]
    fn test_binary_and_none_seeding() {
        let mut rng = StdRng::seed_from_u64(4);
        let b = DenseVector::seeded(256, SeedingStrategy::Binary, &mut rng).unwrap();
        assert!(b.as_slice().iter().all(|&x| x == 0 || x == 1));

        let z = DenseVector::seeded(16, SeedingStrategy::None, &mut rng).unwrap();
        assert_eq!(z, DenseVector::zeros(16));
    }

    #[test]
    fn test_seeding_reproducible() {
        assert_eq!(polar(128, 42), polar(128, 42));
        assert_ne!(polar(128, 42), polar(128, 43));
    }

    #[test]
    fn test_distance_identical_is_zero() {
        let v = polar(1000, 5);
        assert_eq!(v.distance(&v).unwrap(), 0.0);

        let mut rng = StdRng::seed_from_u64(9);
        let r = DenseVector::seeded(1000, SeedingStrategy::Random, &mut rng).unwrap();
        assert_eq!(r.distance(&r).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_opposite_is_two() {
        let v = polar(100, 6);
        let mut inv = v.clone();
        inv.invert().unwrap();

        assert_relative_eq!(v.distance(&inv).unwrap(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_distance_orthogonal() {
        let a = DenseVector::from_vec(vec![1, 1, 1, 1]);
        let b = DenseVector::from_vec(vec![1, -1, 1, -1]);

        assert_relative_eq!(a.distance(&b).unwrap(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(b.distance(&a).unwrap(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_distance_zero_vector() {
        let z = DenseVector::zeros(4);
        let v = DenseVector::from_vec(vec![1, 0, 0, 0]);

        assert_eq!(z.distance(&z).unwrap(), 0.0);
        assert_eq!(z.distance(&v).unwrap(), 1.0);
    }

    #[test]
    fn test_distance_dimension_mismatch() {
        let a = DenseVector::zeros(4);
        let b = DenseVector::zeros(5);

        assert_eq!(
            a.distance(&b),
            Err(HdcError::DimensionMismatch {
                expected: 4,
                actual: 5
            })
        );
    }

    #[test]
    fn test_invert_range() {
        let mut v = DenseVector::from_vec(vec![1, 2, 3, 4]);
        v.invert_range(1, 3).unwrap();
        assert_eq!(v.as_slice(), &[1, -2, -3, 4]);
    }

    #[test]
    fn test_invert_invalid_range() {
        let mut v = DenseVector::from_vec(vec![1, 2, 3, 4]);
        assert!(matches!(
            v.invert_range(2, 2),
            Err(HdcError::InvalidRange { start: 2, end: 2 })
        ));
        assert!(matches!(
            v.invert_range(0, 9),
            Err(HdcError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_double_invert_identity() {
        let v = polar(300, 7);
        let mut w = v.clone();
        w.invert().unwrap().invert().unwrap();
        assert_eq!(v, w);
    }

    #[test]
    fn test_bundle_sums() {
        let vs = vec![
            DenseVector::from_vec(vec![1, -1, 1]),
            DenseVector::from_vec(vec![1, 1, -1]),
            DenseVector::from_vec(vec![1, 1, 1]),
        ];
        assert_eq!(DenseVector::bundle(&vs).unwrap().as_slice(), &[3, 1, 1]);
    }

    #[test]
    fn test_bundle_empty_error() {
        assert_eq!(DenseVector::bundle(&[]), Err(HdcError::EmptyVectorSet));
    }

    #[test]
    fn test_bundle_pair_and_subtract() {
        let a = DenseVector::from_vec(vec![3, 0, -2]);
        let b = DenseVector::from_vec(vec![1, 1, 1]);

        assert_eq!(a.bundle_pair(&b).unwrap().as_slice(), &[4, 1, -1]);
        assert_eq!(a.subtract(&b).unwrap().as_slice(), &[2, -1, -3]);
    }

    #[test]
    fn test_bundle_similar_to_inputs() {
        let vs: Vec<_> = (0..5).map(|i| polar(2000, 100 + i)).collect();
        let bundled = DenseVector::bundle(&vs).unwrap();

        for v in &vs {
            assert!(bundled.distance(v).unwrap() < 0.8);
        }
    }

    #[test]
    fn test_dropout_zero_matches_bundle() {
        let vs: Vec<_> = (0..4).map(|i| polar(256, 20 + i)).collect();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            DenseVector::bundle_with_dropout(&vs, 0.0, &mut rng).unwrap(),
            DenseVector::bundle(&vs).unwrap()
        );
    }

    #[test]
    fn test_dropout_one_keeps_first() {
        let vs: Vec<_> = (0..4).map(|i| polar(256, 30 + i)).collect();
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            DenseVector::bundle_with_dropout(&vs, 1.0, &mut rng).unwrap(),
            vs[0]
        );
        assert_eq!(
            vs[0].subtract_with_dropout(&vs[1], 1.0, &mut rng).unwrap(),
            vs[0]
        );
    }

    #[test]
    fn test_dropout_partial() {
        let a = DenseVector::zeros(1000);
        let b = DenseVector::from_vec(vec![1; 1000]);
        let mut rng = StdRng::seed_from_u64(11);

        let r = a.bundle_pair_with_dropout(&b, 0.5, &mut rng).unwrap();
        let kept = r.as_slice().iter().filter(|&&x| x == 1).count();
        assert!(kept > 400 && kept < 600, "kept: {}", kept);
    }

    #[test]
    fn test_dropout_invalid_probability() {
        let vs = vec![DenseVector::zeros(4), DenseVector::zeros(4)];
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(
            DenseVector::bundle_with_dropout(&vs, 1.5, &mut rng),
            Err(HdcError::InvalidProbability(1.5))
        );
    }

    #[test]
    fn test_encode_decode() {
        let v = DenseVector::from_vec(vec![3, -1, 0, 12]);
        let text = v.encode().unwrap();
        assert_eq!(text, "3,-1,0,12");
        assert_eq!(DenseVector::decode(&text, 4).unwrap(), v);
    }

    #[test]
    fn test_decode_length_mismatch() {
        assert_eq!(
            DenseVector::decode("1,2,3", 4),
            Err(HdcError::LengthMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_decode_parse_error() {
        assert!(matches!(
            DenseVector::decode("1,x,3", 3),
            Err(HdcError::Parse(_))
        ));
    }

    #[test]
    fn test_get_set() {
        let mut v = DenseVector::zeros(3);
        v.set(1, 7).unwrap();
        assert_eq!(v.get(1), Some(7));
        assert_eq!(v.get(3), None);
        assert!(v.set(3, 1).is_err());
    }

    #[test]
    fn test_debug_format() {
        let v = DenseVector::zeros(20);
        let debug = format!("{:?}", v);
        assert!(debug.contains("dim: 20"));
    }
}
