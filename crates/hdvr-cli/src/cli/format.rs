//! Output formatting utilities

use crate::config::HdvrConfig;
use colored::*;
use hdvr_core::Metrics;

/// Format a training log as a table
pub fn format_metrics(metrics: &Metrics) -> String {
    let mut output = format!("\n{}\n", metrics.header().bold().green());
    output.push_str(&format!(
        "  {:>5}  {:>8}  {:>8}\n",
        "epoch".bold(),
        "error".bold(),
        "accuracy".bold()
    ));

    for m in metrics.entries() {
        output.push_str(&format!(
            "  {:>5}  {:>7.2}%  {:>7.2}%\n",
            m.epoch, m.error, m.accuracy
        ));
    }

    output
}

/// Format the effective configuration
pub fn format_config(config: &HdvrConfig) -> String {
    let seed = config
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "random".to_string());

    format!(
        "\n{}\n  Representation: {}\n  Dimension: {}\n  Levels: {}\n  Features: {}\n  Seeding: {}\n  Epochs: {}\n  Training fraction: {}\n  Seed: {}\n",
        "Experiment Configuration".bold().green(),
        config.representation.to_string().cyan(),
        config.dimension.to_string().cyan(),
        config.levels.to_string().cyan(),
        config.features.to_string().cyan(),
        config.seeding.to_string().cyan(),
        config.epochs.to_string().cyan(),
        config.training_fraction.to_string().cyan(),
        seed.cyan()
    )
}

/// Format a labelled path with a presence marker
pub fn format_path_status(label: &str, path: &std::path::Path, present: bool) -> String {
    let marker = if present {
        "present".green()
    } else {
        "missing".yellow()
    };
    format!("  {}: {} ({})", label, path.display(), marker)
}

/// Format error message
pub fn format_error(msg: &str) -> String {
    format!("{} {}", "Error:".red().bold(), msg)
}

/// Format success message
pub fn format_success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg)
}

/// Format warning message
pub fn format_warning(msg: &str) -> String {
    format!("{} {}", "Warning:".yellow().bold(), msg)
}

/// Format info message
pub fn format_info(msg: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), msg)
}
