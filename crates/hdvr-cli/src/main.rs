//! HDVR CLI - train and evaluate hyperdimensional classifiers

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use hdvr_core::Representation;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

use crate::cli::commands::*;
use crate::config::HdvrConfig;

#[derive(Parser)]
#[command(name = "hdvr")]
#[command(about = "Hyperdimensional computing classifier", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Disable colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model and write a metrics report
    Train {
        /// Number of training epochs
        #[arg(short, long)]
        epochs: Option<usize>,

        /// Hypervector dimension
        #[arg(short = 'D', long)]
        dimension: Option<usize>,

        /// Continuous item memory levels
        #[arg(short, long)]
        levels: Option<usize>,

        /// Vector representation (dense, binary)
        #[arg(short, long)]
        representation: Option<Representation>,

        /// RNG seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Encode raw datasets into the dataset cache
    Encode,

    /// Show configuration and checkpoint status
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.debug {
        "hdvr_core=debug,hdvr=debug"
    } else {
        "hdvr_core=info,hdvr=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Disable colors if requested
    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = HdvrConfig::load(cli.config).and_then(|config| match cli.command {
        Commands::Train {
            epochs,
            dimension,
            levels,
            representation,
            seed,
        } => {
            let config = apply_overrides(config, epochs, dimension, levels, representation, seed)?;
            train(&config)
        }
        Commands::Encode => encode(&config),
        Commands::Info => show_info(&config),
    });

    // Handle errors
    if let Err(e) = result {
        eprintln!("{}", cli::format::format_error(&format!("{:#}", e)));
        if cli.debug {
            eprintln!("\n{:#?}", e);
        } else {
            eprintln!("\n{}", "Run with --debug for more details".dimmed());
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Command-line flags take precedence over the config file
fn apply_overrides(
    mut config: HdvrConfig,
    epochs: Option<usize>,
    dimension: Option<usize>,
    levels: Option<usize>,
    representation: Option<Representation>,
    seed: Option<u64>,
) -> Result<HdvrConfig> {
    if let Some(epochs) = epochs {
        config.epochs = epochs;
    }
    if let Some(dimension) = dimension {
        config.dimension = dimension;
    }
    if let Some(levels) = levels {
        config.levels = levels;
    }
    if let Some(representation) = representation {
        config.representation = representation;
        if representation == Representation::Binary {
            config.seeding = hdvr_core::SeedingStrategy::Binary;
        }
    }
    if seed.is_some() {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let config = apply_overrides(
            HdvrConfig::default(),
            Some(7),
            Some(2048),
            None,
            Some(Representation::Binary),
            Some(3),
        )
        .unwrap();

        assert_eq!(config.epochs, 7);
        assert_eq!(config.dimension, 2048);
        assert_eq!(config.levels, 10);
        assert_eq!(config.representation, Representation::Binary);
        assert_eq!(config.seeding, hdvr_core::SeedingStrategy::Binary);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_overrides_validated() {
        let result = apply_overrides(HdvrConfig::default(), None, Some(0), None, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_train_flags() {
        let cli = Cli::try_parse_from(["hdvr", "train", "-e", "3", "-r", "binary", "-s", "9"]).unwrap();
        match cli.command {
            Commands::Train {
                epochs,
                representation,
                seed,
                ..
            } => {
                assert_eq!(epochs, Some(3));
                assert_eq!(representation, Some(Representation::Binary));
                assert_eq!(seed, Some(9));
            }
            _ => panic!("expected train"),
        }
    }
}
