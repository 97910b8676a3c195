//! Experiment configuration

use anyhow::{bail, Context, Result};
use hdvr_core::{ModelParams, Representation, SeedingStrategy, DEFAULT_DIMENSION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "hdvr.json";

/// Settings of one training experiment
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HdvrConfig {
    /// Hypervector dimension
    pub dimension: usize,
    /// Length of the continuous item memory
    pub levels: usize,
    /// Number of feature channels
    pub features: usize,
    pub seeding: SeedingStrategy,
    pub representation: Representation,
    pub epochs: usize,
    /// Share of each class used to build its initial prototype
    pub training_fraction: f32,
    /// RNG seed; a random seed is drawn when absent
    pub seed: Option<u64>,
    /// Encode raw datasets on all cores
    pub parallel_encoding: bool,
    pub memory_path: PathBuf,
    pub dataset_path: PathBuf,
    pub dataset_cache_path: PathBuf,
    pub experiments_path: PathBuf,
    pub experiment_name: String,
}

impl Default for HdvrConfig {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            levels: 10,
            features: 617,
            seeding: SeedingStrategy::Polar,
            representation: Representation::Dense,
            epochs: 2,
            training_fraction: 1.0,
            seed: None,
            parallel_encoding: true,
            memory_path: PathBuf::from("./memory"),
            dataset_path: PathBuf::from("./dataset"),
            dataset_cache_path: PathBuf::from("./memory/dataset"),
            experiments_path: PathBuf::from("./experiments"),
            experiment_name: "experiment".to_string(),
        }
    }
}

impl HdvrConfig {
    /// Loads `path`, or `hdvr.json` if present, or the defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(&path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: HdvrConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            bail!("dimension must be greater than 0");
        }
        if self.levels == 0 {
            bail!("levels must be greater than 0");
        }
        if self.features == 0 {
            bail!("features must be greater than 0");
        }
        if !(self.training_fraction > 0.0 && self.training_fraction <= 1.0) {
            bail!(
                "training_fraction must be within (0, 1], got {}",
                self.training_fraction
            );
        }
        if self.representation == Representation::Binary {
            if !matches!(
                self.seeding,
                SeedingStrategy::None | SeedingStrategy::Binary
            ) {
                bail!(
                    "binary representation cannot be seeded with {}",
                    self.seeding
                );
            }
            if self.dimension % 4 != 0 {
                bail!(
                    "binary representation needs a dimension divisible by 4, got {}",
                    self.dimension
                );
            }
        }
        if self.experiment_name.is_empty() {
            bail!("experiment_name must not be empty");
        }
        Ok(())
    }

    pub fn model_params(&self) -> ModelParams {
        ModelParams {
            levels: self.levels,
            dimension: self.dimension,
            features: self.features,
            seeding: self.seeding,
        }
    }
}
