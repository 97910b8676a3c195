//! Packed binary hypervectors

use super::vector::{check_dimensions, check_range, common_dimension, HdcError, HyperVector};
use super::{Representation, SeedingStrategy};
use rand::Rng;
use std::fmt;

const WORD_BITS: usize = 64;

#[inline]
fn words_for(dimension: usize) -> usize {
    dimension.div_ceil(WORD_BITS)
}

/// A binary hypervector packed into `u64` words
///
/// Bind is XOR, bundle is a majority vote (pairwise: OR) and inversion flips
/// bits. Bits beyond `dimension` in the last word are always zero.
///
/// Text form is big-endian hex: the first digit holds bits `D-1..D-4`, the
/// same order as writing the vector as a bit string.
///
/// # Example
///
/// ```rust
/// use hdvr_core::hdc::{BinaryVector, HyperVector};
///
/// let v = BinaryVector::from_bit_str("10110011").unwrap();
/// assert_eq!(v.encode().unwrap(), "b3");
/// assert_eq!(BinaryVector::decode("b3", 8).unwrap(), v);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BinaryVector {
    bits: Vec<u64>,
    dimension: usize,
}

impl BinaryVector {
    /// Builds a vector from booleans, index 0 first
    pub fn from_bools(values: &[bool]) -> Self {
        let mut v = Self::zeros(values.len());
        for (i, &bit) in values.iter().enumerate() {
            if bit {
                v.bits[i / WORD_BITS] |= 1u64 << (i % WORD_BITS);
            }
        }
        v
    }

    /// Parses a bit string, most significant (highest index) bit first
    pub fn from_bit_str(s: &str) -> Result<Self, HdcError> {
        let s = s.trim();
        let dimension = s.len();
        let mut v = Self::zeros(dimension);
        for (j, c) in s.chars().enumerate() {
            let index = dimension - 1 - j;
            match c {
                '1' => v.bits[index / WORD_BITS] |= 1u64 << (index % WORD_BITS),
                '0' => {}
                other => {
                    return Err(HdcError::Parse(format!(
                        "unexpected character '{}' in bit string",
                        other
                    )))
                }
            }
        }
        Ok(v)
    }

    /// Bit string, highest index first
    pub fn to_bit_string(&self) -> String {
        (0..self.dimension)
            .rev()
            .map(|i| if self.bit(i) { '1' } else { '0' })
            .collect()
    }

    /// Number of set bits
    #[inline]
    pub fn popcount(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Number of differing bits
    #[inline]
    pub fn hamming_distance(&self, other: &Self) -> Result<u32, HdcError> {
        check_dimensions(self.dimension, other.dimension)?;
        Ok(self
            .bits
            .iter()
            .zip(&other.bits)
            .map(|(a, b)| (a ^ b).count_ones())
            .sum())
    }

    /// Returns the internal words (for advanced use cases)
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.bits
    }

    #[inline]
    fn bit(&self, index: usize) -> bool {
        (self.bits[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    /// Mask of the valid bits in the last word
    #[inline]
    fn tail_mask(&self) -> u64 {
        match self.dimension % WORD_BITS {
            0 => u64::MAX,
            r => (1u64 << r) - 1,
        }
    }

    fn clear_tail(&mut self) {
        let mask = self.tail_mask();
        if let Some(last) = self.bits.last_mut() {
            *last &= mask;
        }
    }

    fn zip_words(&self, other: &Self, op: fn(u64, u64) -> u64) -> Result<Self, HdcError> {
        check_dimensions(self.dimension, other.dimension)?;
        let bits = self
            .bits
            .iter()
            .zip(&other.bits)
            .map(|(&a, &b)| op(a, b))
            .collect();
        Ok(Self {
            bits,
            dimension: self.dimension,
        })
    }
}

impl HyperVector for BinaryVector {
    type Element = bool;

    const REPRESENTATION: Representation = Representation::Binary;

    fn zeros(dimension: usize) -> Self {
        Self {
            bits: vec![0; words_for(dimension)],
            dimension,
        }
    }

    /// Only `None` and `Binary` make sense for bits
    fn seeded<R: Rng + ?Sized>(
        dimension: usize,
        strategy: SeedingStrategy,
        rng: &mut R,
    ) -> Result<Self, HdcError> {
        let mut v = Self::zeros(dimension);
        match strategy {
            SeedingStrategy::None => {}
            SeedingStrategy::Binary => {
                for word in v.bits.iter_mut() {
                    *word = rng.gen();
                }
                v.clear_tail();
            }
            other => return Err(HdcError::UnsupportedSeeding(other)),
        }
        Ok(v)
    }

    #[inline]
    fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    fn get(&self, index: usize) -> Option<bool> {
        (index < self.dimension).then(|| self.bit(index))
    }

    fn set(&mut self, index: usize, value: bool) -> Result<(), HdcError> {
        if index >= self.dimension {
            return Err(HdcError::IndexOutOfBounds {
                index,
                len: self.dimension,
            });
        }
        let mask = 1u64 << (index % WORD_BITS);
        if value {
            self.bits[index / WORD_BITS] |= mask;
        } else {
            self.bits[index / WORD_BITS] &= !mask;
        }
        Ok(())
    }

    /// Normalised Hamming distance in `[0, 1]`
    fn distance(&self, other: &Self) -> Result<f32, HdcError> {
        let diffs = self.hamming_distance(other)?;
        if self.dimension == 0 {
            return Ok(0.0);
        }
        Ok(diffs as f32 / self.dimension as f32)
    }

    fn invert_range(&mut self, start: usize, end: usize) -> Result<&mut Self, HdcError> {
        check_range(start, end, self.dimension)?;

        let mut i = start;
        while i < end {
            let word = i / WORD_BITS;
            let offset = i % WORD_BITS;
            let span = (WORD_BITS - offset).min(end - i);
            let mask = if span == WORD_BITS {
                u64::MAX
            } else {
                ((1u64 << span) - 1) << offset
            };
            self.bits[word] ^= mask;
            i += span;
        }
        Ok(self)
    }

    fn bind(&self, other: &Self) -> Result<Self, HdcError> {
        self.zip_words(other, |a, b| a ^ b)
    }

    fn bind_all(vectors: &[Self]) -> Result<Self, HdcError> {
        let dimension = common_dimension(vectors)?;
        let mut result = Self::zeros(dimension);
        for v in vectors {
            for (word, &rhs) in result.bits.iter_mut().zip(&v.bits) {
                *word ^= rhs;
            }
        }
        Ok(result)
    }

    /// Majority vote per bit; a bit is set only if more than half the inputs set it
    fn bundle(vectors: &[Self]) -> Result<Self, HdcError> {
        let dimension = common_dimension(vectors)?;
        if vectors.len() == 1 {
            return Ok(vectors[0].clone());
        }

        let threshold = (vectors.len() / 2) as u32;
        let mut result = Self::zeros(dimension);

        // Process word by word (64 bits at a time)
        for word_idx in 0..result.bits.len() {
            let mut counts = [0u32; WORD_BITS];
            for vector in vectors {
                let word = vector.bits[word_idx];
                for (bit_pos, count) in counts.iter_mut().enumerate() {
                    *count += ((word >> bit_pos) & 1) as u32;
                }
            }

            let mut result_word = 0u64;
            for (bit_pos, &count) in counts.iter().enumerate() {
                if count > threshold {
                    result_word |= 1u64 << bit_pos;
                }
            }
            result.bits[word_idx] = result_word;
        }

        Ok(result)
    }

    /// Pairwise bundle is OR
    fn bundle_pair(&self, other: &Self) -> Result<Self, HdcError> {
        self.zip_words(other, |a, b| a | b)
    }

    /// Masks out the bits set in `other`
    fn subtract(&self, other: &Self) -> Result<Self, HdcError> {
        self.zip_words(other, |a, b| a & !b)
    }

    fn encode(&self) -> Result<String, HdcError> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";
        if self.dimension % 4 != 0 {
            return Err(HdcError::LengthMismatch {
                expected: self.dimension.next_multiple_of(4),
                actual: self.dimension,
            });
        }

        let nibbles = self.dimension / 4;
        let mut out = String::with_capacity(nibbles);
        for k in 0..nibbles {
            let top = self.dimension - 1 - 4 * k;
            let mut value = 0usize;
            for t in 0..4 {
                value = (value << 1) | self.bit(top - t) as usize;
            }
            out.push(DIGITS[value] as char);
        }
        Ok(out)
    }

    fn decode(text: &str, dimension: usize) -> Result<Self, HdcError> {
        let text = text.trim();
        if text.len() * 4 != dimension {
            return Err(HdcError::LengthMismatch {
                expected: dimension,
                actual: text.len() * 4,
            });
        }

        let mut v = Self::zeros(dimension);
        for (k, c) in text.chars().enumerate() {
            let value = c.to_digit(16).ok_or_else(|| {
                HdcError::Parse(format!(
                    "unexpected character '{}' which is not a hex digit",
                    c
                ))
            })?;
            let top = dimension - 1 - 4 * k;
            for t in 0..4 {
                if (value >> (3 - t)) & 1 == 1 {
                    let index = top - t;
                    v.bits[index / WORD_BITS] |= 1u64 << (index % WORD_BITS);
                }
            }
        }
        Ok(v)
    }
}

impl fmt::Debug for BinaryVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BinaryVector {{ bits: {} set / {} total }}",
            self.popcount(),
            self.dimension
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn random(dim: usize, seed: u64) -> BinaryVector {
        let mut rng = StdRng::seed_from_u64(seed);
        BinaryVector::seeded(dim, SeedingStrategy::Binary, &mut rng).unwrap()
    }

    #[test]
    fn test_zero_vector() {
        let zero = BinaryVector::zeros(100);
        assert_eq!(zero.popcount(), 0);
        assert_eq!(zero.distance(&zero).unwrap(), 0.0);
    }

    #[test]
    fn test_random_vector_properties() {
        let v = random(10_000, 1);
        let count = v.popcount();

        // ~50% bits set (±3 sigma)
        assert!(count > 4500 && count < 5500, "popcount: {}", count);
    }

    #[test]
    fn test_seeding_keeps_tail_clear() {
        let v = random(70, 2);
        assert_eq!(v.words()[1] >> 6, 0);
    }

    #[test]
    fn test_unsupported_seeding() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            BinaryVector::seeded(8, SeedingStrategy::Polar, &mut rng),
            Err(HdcError::UnsupportedSeeding(SeedingStrategy::Polar))
        );
    }

    #[test]
    fn test_bind_commutative() {
        let a = random(1000, 3);
        let b = random(1000, 4);

        assert_eq!(a.bind(&b).unwrap(), b.bind(&a).unwrap());
    }

    #[test]
    fn test_bind_self_inverse() {
        let a = random(1000, 5);
        let b = random(1000, 6);

        let bound = a.bind(&b).unwrap();
        assert_eq!(bound.bind(&b).unwrap(), a);
    }

    #[test]
    fn test_bind_all_matches_chain() {
        let vs: Vec<_> = (0..3).map(|i| random(130, 10 + i)).collect();
        let chained = vs[0].bind(&vs[1]).unwrap().bind(&vs[2]).unwrap();

        assert_eq!(BinaryVector::bind_all(&vs).unwrap(), chained);
    }

    #[test]
    fn test_distance_random_approximately_half() {
        let a = random(10_000, 7);
        let b = random(10_000, 8);

        let d = a.distance(&b).unwrap();
        assert!(d > 0.45 && d < 0.55, "distance: {}", d);
    }

    #[test]
    fn test_invert_range_across_words() {
        let mut v = BinaryVector::zeros(200);
        v.invert_range(60, 140).unwrap();

        assert_eq!(v.popcount(), 80);
        assert_eq!(v.get(59), Some(false));
        assert_eq!(v.get(60), Some(true));
        assert_eq!(v.get(139), Some(true));
        assert_eq!(v.get(140), Some(false));
    }

    #[test]
    fn test_invert_full_and_back() {
        let v = random(77, 9);
        let mut w = v.clone();
        w.invert().unwrap();

        assert_eq!(v.distance(&w).unwrap(), 1.0);
        w.invert().unwrap();
        assert_eq!(v, w);
    }

    #[test]
    fn test_invert_invalid_range() {
        let mut v = BinaryVector::zeros(8);
        assert_eq!(
            v.invert_range(5, 3).map(|_| ()),
            Err(HdcError::InvalidRange { start: 5, end: 3 })
        );
    }

    #[test]
    fn test_bundle_majority_vote() {
        let vs = vec![
            BinaryVector::from_bit_str("1100").unwrap(),
            BinaryVector::from_bit_str("1010").unwrap(),
            BinaryVector::from_bit_str("1001").unwrap(),
        ];
        assert_eq!(BinaryVector::bundle(&vs).unwrap().to_bit_string(), "1000");
    }

    #[test]
    fn test_bundle_ties_favor_zero() {
        let vs = vec![
            BinaryVector::from_bit_str("1100").unwrap(),
            BinaryVector::from_bit_str("1010").unwrap(),
        ];
        assert_eq!(BinaryVector::bundle(&vs).unwrap().to_bit_string(), "1000");
    }

    #[test]
    fn test_bundle_single_vector() {
        let v = random(100, 12);
        assert_eq!(BinaryVector::bundle(&[v.clone()]).unwrap(), v);
    }

    #[test]
    fn test_bundle_empty_error() {
        assert_eq!(BinaryVector::bundle(&[]), Err(HdcError::EmptyVectorSet));
    }

    #[test]
    fn test_bundle_many_vectors() {
        // more inputs than fit in a u8 counter
        let v = random(128, 13);
        let vs = vec![v.clone(); 300];
        assert_eq!(BinaryVector::bundle(&vs).unwrap(), v);
    }

    #[test]
    fn test_bundle_pair_and_subtract() {
        let a = BinaryVector::from_bit_str("1100").unwrap();
        let b = BinaryVector::from_bit_str("1010").unwrap();

        assert_eq!(a.bundle_pair(&b).unwrap().to_bit_string(), "1110");
        assert_eq!(a.subtract(&b).unwrap().to_bit_string(), "0100");
    }

    #[test]
    fn test_hex_scenario() {
        let v = BinaryVector::from_bit_str("10110011").unwrap();
        assert_eq!(v.encode().unwrap(), "b3");
    }

    #[test]
    fn test_hex_round_trip() {
        let v = random(256, 14);
        let hex = v.encode().unwrap();
        assert_eq!(hex.len(), 64);
        assert_eq!(BinaryVector::decode(&hex, 256).unwrap(), v);
    }

    #[test]
    fn test_hex_decode_uppercase() {
        let v = BinaryVector::decode("B3", 8).unwrap();
        assert_eq!(v.to_bit_string(), "10110011");
    }

    #[test]
    fn test_hex_decode_length_mismatch() {
        assert_eq!(
            BinaryVector::decode("b3", 12),
            Err(HdcError::LengthMismatch {
                expected: 12,
                actual: 8
            })
        );
    }

    #[test]
    fn test_hex_decode_bad_digit() {
        assert!(matches!(
            BinaryVector::decode("g3", 8),
            Err(HdcError::Parse(_))
        ));
    }

    #[test]
    fn test_hex_encode_requires_multiple_of_four() {
        assert!(BinaryVector::zeros(10).encode().is_err());
    }

    #[test]
    fn test_from_bools_index_order() {
        let v = BinaryVector::from_bools(&[true, false, false, false]);
        assert_eq!(v.to_bit_string(), "0001");
        assert_eq!(v.get(0), Some(true));
    }

    #[test]
    fn test_get_set() {
        let mut v = BinaryVector::zeros(70);
        v.set(65, true).unwrap();
        assert_eq!(v.get(65), Some(true));
        v.set(65, false).unwrap();
        assert_eq!(v.get(65), Some(false));
        assert_eq!(v.get(70), None);
        assert!(v.set(70, true).is_err());
    }

    #[test]
    fn test_debug_format() {
        let v = BinaryVector::zeros(16);
        let debug = format!("{:?}", v);
        assert!(debug.contains("bits: 0 set / 16 total"));
    }
}
