//! Prototype configuration and error-driven training

use crate::dataset::{Dataset, DatasetSource, RawDataset, Split};
use crate::error::{HdvrError, Result};
use crate::hdc::{HdcError, HyperVector};
use crate::memory::AssociativeMemory;
use crate::metrics::Metrics;
use crate::model::Model;
use std::collections::BTreeMap;

/// Where a trainer is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrainerState {
    /// No class prototypes yet
    Unconfigured,
    /// Prototypes built from training data or loaded from a checkpoint
    Configured,
    /// At least one correction epoch has run
    Training,
    /// A full training run finished and produced metrics
    Reported,
}

/// Drives a [`Model`] through configuration, training and evaluation
///
/// # Example
///
/// ```rust
/// use hdvr_core::dataset::Dataset;
/// use hdvr_core::hdc::{DenseVector, SeedingStrategy};
/// use hdvr_core::model::{Model, ModelParams};
/// use hdvr_core::trainer::Trainer;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let params = ModelParams { levels: 2, dimension: 4, features: 1, seeding: SeedingStrategy::Polar };
/// let model: Model<DenseVector> = Model::new(params, &mut rng).unwrap();
///
/// let mut data = Dataset::new();
/// data.push(DenseVector::from_vec(vec![1, 1, 1, 1]), 0);
/// data.push(DenseVector::from_vec(vec![1, -1, 1, -1]), 1);
///
/// let mut trainer = Trainer::new(model);
/// trainer.set_datasets(data.clone(), data);
/// trainer.configure(1.0).unwrap();
///
/// let metrics = trainer.train(1).unwrap();
/// assert_eq!(metrics.last().unwrap().accuracy, 100.0);
/// ```
pub struct Trainer<V> {
    model: Model<V>,
    train: Dataset<V>,
    test: Dataset<V>,
    state: TrainerState,
    parallel_encoding: bool,
}

impl<V: HyperVector> Trainer<V> {
    pub fn new(model: Model<V>) -> Self {
        let state = if model.is_untrained() {
            TrainerState::Unconfigured
        } else {
            TrainerState::Configured
        };
        Self {
            model,
            train: Dataset::new(),
            test: Dataset::new(),
            state,
            parallel_encoding: false,
        }
    }

    /// Encode raw datasets on the rayon pool instead of sequentially
    pub fn with_parallel_encoding(mut self, parallel: bool) -> Self {
        self.parallel_encoding = parallel;
        self
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    pub fn set_datasets(&mut self, train: Dataset<V>, test: Dataset<V>) {
        self.train = train;
        self.test = test;
    }

    pub fn train_dataset(&self) -> &Dataset<V> {
        &self.train
    }

    pub fn test_dataset(&self) -> &Dataset<V> {
        &self.test
    }

    /// Rebuilds the class prototypes from the training dataset
    ///
    /// See [`configure_from`](Self::configure_from).
    pub fn configure(&mut self, fraction: f32) -> Result<()> {
        let prototypes = class_prototypes(&self.train, fraction)?;
        self.install(prototypes)
    }

    /// Rebuilds the class prototypes from `dataset`
    ///
    /// Each class prototype is the bundle of the first `⌊n · fraction⌋`
    /// samples of that class (at least one). Labels must run contiguously
    /// from 0 and `fraction` must lie in `(0, 1]`.
    pub fn configure_from(&mut self, dataset: &Dataset<V>, fraction: f32) -> Result<()> {
        let prototypes = class_prototypes(dataset, fraction)?;
        self.install(prototypes)
    }

    fn install(&mut self, prototypes: Vec<V>) -> Result<()> {
        let memory = self.model.associative_mut();
        memory.clear();
        for prototype in prototypes {
            memory.insert(prototype)?;
        }
        tracing::debug!("Configured {} class prototypes", memory.len());
        self.state = TrainerState::Configured;
        Ok(())
    }

    /// Label of the prototype nearest to `sample`
    pub fn predict(&self, sample: &V) -> Result<usize> {
        self.model.associative().find(sample)
    }

    /// One pass over the training dataset, correcting every misprediction
    ///
    /// Returns the percentage of samples that were mispredicted.
    pub fn train_one_epoch(&mut self) -> Result<f32> {
        let memory = self.model.associative_mut();
        let mut wrong = 0;

        for sample in self.train.iter() {
            let predicted = memory.find(&sample.features)?;
            if predicted != sample.label {
                wrong += 1;
                correct(memory, predicted, sample.label, &sample.features)?;
            }
        }

        self.state = TrainerState::Training;
        Ok(percentage(wrong, self.train.len()))
    }

    /// Accuracy percentage on the test dataset
    pub fn test(&self) -> Result<f32> {
        self.evaluate(&self.test)
    }

    /// Accuracy percentage on `dataset` without changing the model
    pub fn evaluate(&self, dataset: &Dataset<V>) -> Result<f32> {
        let mut right = 0;
        for sample in dataset {
            if self.predict(&sample.features)? == sample.label {
                right += 1;
            }
        }
        Ok(percentage(right, dataset.len()))
    }

    /// Runs `epochs` correction epochs, testing after each
    ///
    /// The first metric row is the accuracy before training. An
    /// unconfigured trainer is configured from the whole training dataset
    /// first.
    pub fn train(&mut self, epochs: usize) -> Result<Metrics> {
        if self.train.is_empty() || self.test.is_empty() {
            return Err(HdvrError::NotTrainable);
        }
        if self.state == TrainerState::Unconfigured {
            self.configure(1.0)?;
        }

        let params = self.model.params();
        let mut metrics = Metrics::new(format!(
            "Training: epochs: {}, levels: {}, dimensions: {}, frequency points: {}",
            epochs, params.levels, params.dimension, params.features
        ));

        let mut accuracy = self.test()?;
        tracing::info!("Accuracy before training: {}%", accuracy);
        metrics.log(0, 0.0, accuracy);

        for epoch in 1..=epochs {
            let error = self.train_one_epoch()?;
            accuracy = self.test()?;
            tracing::info!("[Epoch: {}]: error: {}% - accuracy: {}%", epoch, error, accuracy);
            metrics.log(epoch, error, accuracy);
        }

        self.state = TrainerState::Reported;
        Ok(metrics)
    }

    /// Loads both datasets from `source` and configures the prototypes
    ///
    /// Encoded datasets are tried first; raw datasets are encoded with the
    /// model otherwise. Returns `false` when neither could be loaded.
    pub fn load_datasets<S: DatasetSource>(&mut self, source: &S, fraction: f32) -> Result<bool> {
        let loaded = match self.load_encoded(source) {
            Ok(pair) => Some(pair),
            Err(e) => {
                report_load_failure("encoded", &e);
                match self.load_raw(source) {
                    Ok(pair) => Some(pair),
                    Err(e) => {
                        report_load_failure("raw", &e);
                        None
                    }
                }
            }
        };

        match loaded {
            Some((train, test)) => {
                tracing::info!(
                    "Loaded {} training samples, and {} testing samples",
                    train.len(),
                    test.len()
                );
                self.set_datasets(train, test);
                self.configure(fraction)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn load_encoded<S: DatasetSource>(&self, source: &S) -> Result<(Dataset<V>, Dataset<V>)> {
        let dimension = self.model.params().dimension;
        let train = source.load_encoded(Split::Train, dimension)?;
        let test = source.load_encoded(Split::Test, dimension)?;
        Ok((train, test))
    }

    fn load_raw<S: DatasetSource>(&self, source: &S) -> Result<(Dataset<V>, Dataset<V>)> {
        let raw_train = source.load_raw(Split::Train)?;
        let raw_test = source.load_raw(Split::Test)?;

        let encoder = self.model.encoder();
        let encode = |dataset: &RawDataset| {
            if self.parallel_encoding {
                encoder.par_encode_dataset(dataset)
            } else {
                encoder.encode_dataset(dataset)
            }
        };

        tracing::info!("Encoding {} training samples", raw_train.len());
        let train = encode(&raw_train)?;
        tracing::info!("Encoding {} testing samples", raw_test.len());
        let test = encode(&raw_test)?;
        Ok((train, test))
    }

    /// Caches both encoded datasets in `source`
    pub fn save_datasets<S: DatasetSource>(&self, source: &S) -> Result<()> {
        source.save_encoded(Split::Train, &self.train)?;
        source.save_encoded(Split::Test, &self.test)
    }

    pub fn model(&self) -> &Model<V> {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model<V> {
        &mut self.model
    }

    pub fn into_model(self) -> Model<V> {
        self.model
    }
}

fn class_prototypes<V: HyperVector>(dataset: &Dataset<V>, fraction: f32) -> Result<Vec<V>> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(HdvrError::InvalidParameter(format!(
            "training fraction must be within (0, 1], got {}",
            fraction
        )));
    }

    if dataset.is_empty() {
        return Err(HdcError::EmptyVectorSet.into());
    }

    let mut groups: BTreeMap<usize, Vec<&V>> = BTreeMap::new();
    for sample in dataset {
        groups.entry(sample.label).or_default().push(&sample.features);
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(class, (label, members))| {
            if label != class {
                return Err(HdvrError::MissingClass(class));
            }
            let take = ((members.len() as f32 * fraction) as usize).max(1);
            let chosen: Vec<V> = members[..take].iter().map(|&v| v.clone()).collect();
            Ok(V::bundle(&chosen)?)
        })
        .collect()
}

/// Moves the mispredicted class away from `sample` and the true class
/// towards it
fn correct<V: HyperVector>(
    memory: &mut AssociativeMemory<V>,
    predicted: usize,
    label: usize,
    sample: &V,
) -> Result<()> {
    if label >= memory.len() {
        return Err(HdvrError::UnknownLabel(label));
    }
    let weakened = memory[predicted].subtract(sample)?;
    memory.replace(predicted, weakened)?;
    let strengthened = memory[label].bundle_pair(sample)?;
    memory.replace(label, strengthened)?;
    Ok(())
}

fn percentage(count: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    count as f32 / total as f32 * 100.0
}

fn report_load_failure(kind: &str, error: &HdvrError) {
    if error.is_not_found() {
        tracing::debug!("No {} datasets: {}", kind, error);
    } else {
        tracing::warn!("Failed to load {} datasets: {}", kind, error);
    }
}
