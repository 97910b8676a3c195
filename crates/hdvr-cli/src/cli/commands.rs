//! Command implementations

use super::format::*;
use crate::config::HdvrConfig;
use anyhow::{bail, Context, Result};
use colored::*;
use hdvr_core::dataset::{ENCODED_EXTENSION, RAW_EXTENSION};
use hdvr_core::model::{ASSOCIATIVE_MEMORY_FILE, CHANNEL_MEMORY_FILE, CONTINUOUS_MEMORY_FILE};
use hdvr_core::{
    BinaryVector, CsvMetricsSink, DatasetSource, DenseVector, DirectorySource, HyperVector,
    MemoryStore, MetricsSink, Model, Representation, Split, Trainer,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Runs the full experiment with the configured representation
pub fn train(config: &HdvrConfig) -> Result<()> {
    match config.representation {
        Representation::Dense => run_experiment::<DenseVector>(config),
        Representation::Binary => run_experiment::<BinaryVector>(config),
    }
}

/// Encodes the raw datasets into the cache only
pub fn encode(config: &HdvrConfig) -> Result<()> {
    match config.representation {
        Representation::Dense => encode_datasets::<DenseVector>(config),
        Representation::Binary => encode_datasets::<BinaryVector>(config),
    }
}

/// Prints the effective configuration and what exists on disk
pub fn show_info(config: &HdvrConfig) -> Result<()> {
    println!("{}", format_config(config));

    println!("{}", "Model checkpoint".bold());
    for file in [
        ASSOCIATIVE_MEMORY_FILE,
        CONTINUOUS_MEMORY_FILE,
        CHANNEL_MEMORY_FILE,
    ] {
        let path = config.memory_path.join(file);
        println!("{}", format_path_status(file, &path, path.is_file()));
    }

    let classes = match config.representation {
        Representation::Dense => checkpoint_classes::<DenseVector>(config),
        Representation::Binary => checkpoint_classes::<BinaryVector>(config),
    };
    match classes {
        Some(n) => println!("  Classes: {}", n),
        None => println!("  Classes: untrained"),
    }

    println!("\n{}", "Datasets".bold());
    let raw = DirectorySource::new(&config.dataset_path);
    let cache = DirectorySource::new(&config.dataset_cache_path);
    for split in [Split::Train, Split::Test] {
        println!(
            "{}",
            format_path_status(
                &format!("raw {}", split.prefix()),
                raw.root(),
                raw.contains(split, RAW_EXTENSION)
            )
        );
        println!(
            "{}",
            format_path_status(
                &format!("encoded {}", split.prefix()),
                cache.root(),
                cache.contains(split, ENCODED_EXTENSION)
            )
        );
    }

    Ok(())
}

fn rng_for(config: &HdvrConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn load_model<V: HyperVector>(config: &HdvrConfig, rng: &mut StdRng) -> Result<Model<V>> {
    let mut model: Model<V> =
        Model::new(config.model_params(), rng).context("Failed to create model")?;
    if !model.load(&config.memory_path, rng)? {
        println!(
            "{}",
            format_info("No model could be loaded; continuing with untrained model.")
        );
    }
    Ok(model)
}

fn run_experiment<V: HyperVector>(config: &HdvrConfig) -> Result<()> {
    tracing::info!(
        representation = %config.representation,
        dimension = config.dimension,
        epochs = config.epochs,
        "Starting experiment"
    );
    let mut rng = rng_for(config);
    let model = load_model::<V>(config, &mut rng)?;

    let mut trainer = Trainer::new(model).with_parallel_encoding(config.parallel_encoding);
    let cache = DirectorySource::new(&config.dataset_cache_path);
    if !trainer.load_datasets(&cache, config.training_fraction)? {
        let raw = DirectorySource::new(&config.dataset_path);
        if !trainer.load_datasets(&raw, config.training_fraction)? {
            bail!("Could not find a dataset in {}", raw.root().display());
        }
        tracing::debug!("Caching encoded datasets in {}", cache.root().display());
        if let Err(e) = trainer.save_datasets(&cache) {
            eprintln!(
                "{}",
                format_warning(&format!("Failed to save dataset: {}", e))
            );
        }
    }
    println!(
        "{}",
        format_info(&format!(
            "Loaded {} training samples, and {} testing samples",
            trainer.train_dataset().len(),
            trainer.test_dataset().len()
        ))
    );

    let metrics = trainer.train(config.epochs).context("Training failed")?;
    println!("{}", format_metrics(&metrics));

    let mut sink = CsvMetricsSink::new(&config.experiments_path, &config.experiment_name);
    sink.write(&metrics).context("Failed to write training report")?;
    trainer
        .model()
        .save(&config.memory_path)
        .context("Failed to save model")?;

    if let Some(report) = sink.written().last() {
        println!(
            "{}",
            format_success(&format!("Training complete, report saved to {}", report.display()))
        );
    }
    Ok(())
}

fn encode_datasets<V: HyperVector>(config: &HdvrConfig) -> Result<()> {
    let mut rng = rng_for(config);
    let model = load_model::<V>(config, &mut rng)?;
    let encoder = model.encoder();

    let raw = DirectorySource::new(&config.dataset_path);
    let cache = DirectorySource::new(&config.dataset_cache_path);
    for split in [Split::Train, Split::Test] {
        let dataset = raw
            .load_raw(split)
            .with_context(|| format!("Failed to load raw {} dataset", split.prefix()))?;
        let encoded = if config.parallel_encoding {
            encoder.par_encode_dataset(&dataset)?
        } else {
            encoder.encode_dataset(&dataset)?
        };
        cache.save_encoded(split, &encoded)?;
        println!(
            "{}",
            format_success(&format!(
                "Encoded {} {} samples",
                encoded.len(),
                split.prefix()
            ))
        );
    }

    // Cached encodings are only valid with the memories that produced them
    model
        .save(&config.memory_path)
        .context("Failed to save model")?;
    Ok(())
}

fn checkpoint_classes<V: HyperVector>(config: &HdvrConfig) -> Option<usize> {
    let path = config.memory_path.join(ASSOCIATIVE_MEMORY_FILE);
    MemoryStore::<V>::open(path, config.dimension)
        .ok()
        .map(|store| store.len())
        .filter(|&n| n > 0)
}
