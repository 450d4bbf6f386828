// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: normalized ELBO loss over the epoch's updates
//   - val_loss:   normalized ELBO loss on the validation slice
//
// Both losses are per pixel per example, so they are comparable
// across batch sizes and plottable on one axis.
//
// Output file: {work_dir}/checkpoints/metrics.csv
//
// How to read the metrics:
//   - Loss should decrease each epoch (model is learning)
//   - If val_loss rises while train_loss falls → overfitting
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average per-pixel loss over the epoch's optimizer updates
    pub train_loss: f64,

    /// Average per-pixel loss on the validation set
    /// Should track train_loss — divergence indicates overfitting
    pub val_loss: f64,
}

impl EpochMetrics {
    /// Create a new EpochMetrics record
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64) -> Self {
        Self { epoch, train_loss, val_loss }
    }

    /// Returns true if this epoch improved over the previous best val_loss
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        // Write the header only if the file is new —
        // this allows appending to an existing log across runs
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,val_loss")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(f, "{},{:.6},{:.6}", m.epoch, m.train_loss, m.val_loss)?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 0.25, 0.23);
        // 0.23 < 0.30 → this is an improvement
        assert!(m.is_improvement(0.30));
        // 0.23 is NOT less than 0.20 → not an improvement
        assert!(!m.is_improvement(0.20));
    }

    #[test]
    fn test_logs_header_and_rows() {
        let dir = std::env::temp_dir().join("conv_vae_metrics_test");
        fs::remove_dir_all(&dir).ok();

        let logger = MetricsLogger::new(&dir).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, 0.45)).unwrap();
        logger.log(&EpochMetrics::new(2, 0.25, 0.23)).unwrap();

        let contents = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "epoch,train_loss,val_loss");
        assert_eq!(lines[1], "1,0.500000,0.450000");
        assert_eq!(lines[2], "2,0.250000,0.230000");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_header_written_once_across_runs() {
        let dir = std::env::temp_dir().join("conv_vae_metrics_test_reopen");
        fs::remove_dir_all(&dir).ok();

        // First run writes the header and one row
        let logger = MetricsLogger::new(&dir).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, 0.45)).unwrap();

        // A second run appends — no duplicate header
        let logger = MetricsLogger::new(&dir).unwrap();
        logger.log(&EpochMetrics::new(2, 0.25, 0.23)).unwrap();

        let contents = fs::read_to_string(logger.csv_path()).unwrap();
        let headers = contents
            .lines()
            .filter(|l| *l == "epoch,train_loss,val_loss")
            .count();
        assert_eq!(headers, 1);
        assert_eq!(contents.lines().count(), 3);

        fs::remove_dir_all(&dir).ok();
    }
}
