//! Training metrics and report sinks

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Highest numeric suffix tried before a report name is reused
const MAX_REPORT_SUFFIX: usize = 100;

/// One row of the training log
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetric {
    pub epoch: usize,
    /// Percentage of training samples misclassified during the epoch
    pub error: f32,
    /// Percentage of test samples classified correctly after the epoch
    pub accuracy: f32,
}

/// Append-only training log with a description line
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    header: String,
    entries: Vec<TrainingMetric>,
}

impl Metrics {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            entries: Vec::new(),
        }
    }

    pub fn log(&mut self, epoch: usize, error: f32, accuracy: f32) {
        self.entries.push(TrainingMetric {
            epoch,
            error,
            accuracy,
        });
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn entries(&self) -> &[TrainingMetric] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TrainingMetric> {
        self.entries.last()
    }

    /// Writes the report: column header, one row per entry, then the
    /// description as a single field
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);
        wtr.write_record(["epoch", "error", "accuracy"])?;
        for m in &self.entries {
            wtr.write_record(&[
                m.epoch.to_string(),
                m.error.to_string(),
                m.accuracy.to_string(),
            ])?;
        }
        wtr.write_record([self.header.as_str()])?;
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Destination for finished training logs
pub trait MetricsSink {
    fn write(&mut self, metrics: &Metrics) -> Result<()>;
}

/// Collects logs in memory
impl MetricsSink for Vec<Metrics> {
    fn write(&mut self, metrics: &Metrics) -> Result<()> {
        self.push(metrics.clone());
        Ok(())
    }
}

/// Writes each log to `<dir>/<name>[N].csv` without overwriting earlier runs
///
/// The first report is `<name>.csv`, later ones take the first free suffix
/// in `1..100`.
#[derive(Clone, Debug)]
pub struct CsvMetricsSink {
    dir: PathBuf,
    name: String,
    written: Vec<PathBuf>,
}

impl CsvMetricsSink {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            written: Vec::new(),
        }
    }

    /// Reports written by this sink so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn report_path(&self, suffix: usize) -> PathBuf {
        if suffix == 0 {
            self.dir.join(format!("{}.csv", self.name))
        } else {
            self.dir.join(format!("{}{}.csv", self.name, suffix))
        }
    }

    /// First report path not already taken
    pub fn next_path(&self) -> PathBuf {
        let suffix = (0..MAX_REPORT_SUFFIX)
            .find(|&i| !self.report_path(i).is_file())
            .unwrap_or(MAX_REPORT_SUFFIX);
        self.report_path(suffix)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl MetricsSink for CsvMetricsSink {
    fn write(&mut self, metrics: &Metrics) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.next_path();
        let file = fs::File::create(&path)?;
        metrics.write_csv(io::BufWriter::new(file))?;
        tracing::info!("Wrote training report to {}", path.display());
        self.written.push(path);
        Ok(())
    }
}
