//! Feature encoding
//!
//! Each continuous feature value is quantised into a level of the
//! continuous item memory, bound to its channel's role vector, and the bound
//! pairs of one sample are bundled into a single hypervector.

use crate::dataset::{Dataset, RawDataset, Sample};
use crate::error::{HdvrError, Result};
use crate::hdc::{HdcError, HyperVector};
use crate::memory::{ChannelMemory, ContinuousItemMemory};
use rayon::prelude::*;

/// Lowest encodable feature value
pub const MIN_FREQUENCY: f32 = -1.0;

/// Highest encodable feature value
pub const MAX_FREQUENCY: f32 = 1.0;

const PROGRESS_UPDATES: usize = 10;

/// Level index of `value` among `levels` equal-width bins over
/// `[MIN_FREQUENCY, MAX_FREQUENCY]`
///
/// Returns the first bin whose upper threshold is not exceeded by `value`;
/// the last bin also absorbs `MAX_FREQUENCY` itself.
///
/// # Example
///
/// ```rust
/// use hdvr_core::encoder::frequency_bin;
///
/// assert_eq!(frequency_bin(-1.0, 10).unwrap(), 0);
/// assert_eq!(frequency_bin(0.5, 10).unwrap(), 7);
/// assert_eq!(frequency_bin(1.0, 10).unwrap(), 9);
/// assert!(frequency_bin(1.5, 10).is_err());
/// ```
pub fn frequency_bin(value: f32, levels: usize) -> Result<usize> {
    if levels == 0 {
        return Err(HdvrError::InvalidParameter(
            "frequency binning needs at least one level".to_string(),
        ));
    }
    if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&value) {
        return Err(HdvrError::OutOfRange {
            value,
            min: MIN_FREQUENCY,
            max: MAX_FREQUENCY,
        });
    }

    let step = (MAX_FREQUENCY - MIN_FREQUENCY) / levels as f32;
    for i in 0..levels {
        let threshold = MIN_FREQUENCY + step * (i + 1) as f32;
        if value <= threshold {
            return Ok(i);
        }
    }
    Ok(levels - 1)
}

/// Encodes feature vectors with a channel memory and a continuous item memory
pub struct Encoder<'a, V> {
    channels: &'a ChannelMemory<V>,
    items: &'a ContinuousItemMemory<V>,
}

impl<'a, V: HyperVector> Encoder<'a, V> {
    pub fn new(channels: &'a ChannelMemory<V>, items: &'a ContinuousItemMemory<V>) -> Self {
        Self { channels, items }
    }

    /// Encodes one sample into a single hypervector
    ///
    /// Feature `i` is bound to channel `i`, so `features` must hold exactly
    /// one value per channel.
    pub fn encode(&self, features: &[f32]) -> Result<V> {
        if features.is_empty() {
            return Err(HdcError::EmptyVectorSet.into());
        }
        if features.len() != self.channels.len() {
            return Err(HdcError::DimensionMismatch {
                expected: self.channels.len(),
                actual: features.len(),
            }
            .into());
        }

        let levels = self.items.len();
        let bound = features
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let bin = frequency_bin(value, levels)?;
                Ok(self.channels[i].bind(&self.items[bin])?)
            })
            .collect::<Result<Vec<V>>>()?;

        Ok(V::bundle(&bound)?)
    }

    /// Encodes every sample in order, keeping each sample's label
    pub fn encode_dataset(&self, dataset: &RawDataset) -> Result<Dataset<V>> {
        let total = dataset.len();
        let chunk = (total / PROGRESS_UPDATES).max(1);
        let mut encoded = Dataset::with_capacity(total);

        for (i, sample) in dataset.iter().enumerate() {
            encoded.push(self.encode(&sample.features)?, sample.label);
            if (i + 1) % chunk == 0 {
                tracing::debug!("Encoded {}% of {} samples", (i + 1) * 100 / total, total);
            }
        }

        Ok(encoded)
    }

    /// Same result as [`encode_dataset`](Self::encode_dataset), spread over
    /// the rayon thread pool
    pub fn par_encode_dataset(&self, dataset: &RawDataset) -> Result<Dataset<V>> {
        let samples = dataset
            .samples()
            .par_iter()
            .map(|sample| Ok(Sample::new(self.encode(&sample.features)?, sample.label)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Dataset::from_samples(samples))
    }
}
