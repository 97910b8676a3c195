//! HDC operations: binding, bundling, inversion and subtraction
//!
//! Free-function forms of the [`HyperVector`] methods, usable with either
//! representation.

use super::vector::{HdcError, HyperVector};

/// Binds two hypervectors (product for dense, XOR for binary)
///
/// # Example
///
/// ```rust
/// use hdvr_core::hdc::{bind, DenseVector};
///
/// let a = DenseVector::from_vec(vec![1, 1, -1, -1]);
/// let b = DenseVector::from_vec(vec![1, -1, 1, -1]);
/// assert_eq!(bind(&a, &b).unwrap().as_slice(), &[1, -1, -1, 1]);
/// ```
#[inline]
pub fn bind<V: HyperVector>(v1: &V, v2: &V) -> Result<V, HdcError> {
    v1.bind(v2)
}

/// Binds multiple vectors in sequence
///
/// Equivalent to `v1.bind(&v2).bind(&v3)...`
pub fn bind_multiple<V: HyperVector>(vectors: &[V]) -> Result<V, HdcError> {
    V::bind_all(vectors)
}

/// Bundles multiple hypervectors (sum for dense, majority for binary)
///
/// # Example
///
/// ```rust
/// use hdvr_core::hdc::{bundle, BinaryVector, HyperVector};
///
/// let vs = vec![
///     BinaryVector::from_bit_str("1100").unwrap(),
///     BinaryVector::from_bit_str("1010").unwrap(),
///     BinaryVector::from_bit_str("1001").unwrap(),
/// ];
/// assert_eq!(bundle(&vs).unwrap().to_bit_string(), "1000");
/// ```
pub fn bundle<V: HyperVector>(vectors: &[V]) -> Result<V, HdcError> {
    V::bundle(vectors)
}

/// Two-argument bundle (sum for dense, OR for binary)
#[inline]
pub fn bundle_pair<V: HyperVector>(v1: &V, v2: &V) -> Result<V, HdcError> {
    v1.bundle_pair(v2)
}

/// Subtraction (difference for dense, `a & !b` for binary)
#[inline]
pub fn subtract<V: HyperVector>(v1: &V, v2: &V) -> Result<V, HdcError> {
    v1.subtract(v2)
}

/// Returns an inverted copy
///
/// # Example
///
/// ```rust
/// use hdvr_core::hdc::{invert, BinaryVector, HyperVector};
///
/// let v = BinaryVector::from_bit_str("1100").unwrap();
/// assert_eq!(invert(&v).unwrap().to_bit_string(), "0011");
/// ```
pub fn invert<V: HyperVector>(v: &V) -> Result<V, HdcError> {
    let mut result = v.clone();
    result.invert()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hdc::{BinaryVector, DenseVector, SeedingStrategy};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bind_function() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = BinaryVector::seeded(256, SeedingStrategy::Binary, &mut rng).unwrap();
        let b = BinaryVector::seeded(256, SeedingStrategy::Binary, &mut rng).unwrap();

        assert_eq!(bind(&a, &b).unwrap(), a.bind(&b).unwrap());
    }

    #[test]
    fn test_bundle_function() {
        let vs = vec![
            DenseVector::from_vec(vec![1, 2]),
            DenseVector::from_vec(vec![3, 4]),
        ];
        assert_eq!(bundle(&vs).unwrap().as_slice(), &[4, 6]);
    }

    #[test]
    fn test_bind_multiple_single() {
        let v = DenseVector::from_vec(vec![2, -3]);
        assert_eq!(bind_multiple(&[v.clone()]).unwrap(), v);
    }

    #[test]
    fn test_bind_multiple_empty_error() {
        let result = bind_multiple::<BinaryVector>(&[]);
        assert!(matches!(result, Err(HdcError::EmptyVectorSet)));
    }

    #[test]
    fn test_invert_copy_leaves_original() {
        let v = DenseVector::from_vec(vec![1, -2, 3]);
        let inv = invert(&v).unwrap();

        assert_eq!(inv.as_slice(), &[-1, 2, -3]);
        assert_eq!(v.as_slice(), &[1, -2, 3]);
    }

    #[test]
    fn test_invert_double_is_identity() {
        let v = BinaryVector::from_bit_str("10110011").unwrap();
        assert_eq!(invert(&invert(&v).unwrap()).unwrap(), v);
    }

    #[test]
    fn test_pair_operations_dimension_checked() {
        let a = DenseVector::zeros(3);
        let b = DenseVector::zeros(4);

        assert!(bundle_pair(&a, &b).is_err());
        assert!(subtract(&a, &b).is_err());
    }
}
