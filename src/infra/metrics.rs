// ============================================================
// Layer 6 — Evaluation Run Log
// ============================================================
// Records one CSV row per evaluation run so model quality can be
// compared across training iterations.
//
// Columns:
//   run       — 1-based run number within this log file
//   samples   — validation samples that were actually scored
//   failures  — samples excluded because prediction failed
//   cer       — aggregate character error rate
//   wer       — aggregate word error rate
//   passed    — whether cer met the configured target
//
// Output file: <model_dir>/eval_history.csv
//
// Example:
//   run,samples,failures,cer,wer,passed
//   1,40,2,0.214000,0.380000,false
//   2,40,0,0.085000,0.150000,true
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

/// One row of the evaluation history.
#[derive(Debug, Clone)]
pub struct EvalRecord {
    pub run:      usize,
    pub samples:  usize,
    pub failures: usize,
    pub cer:      f64,
    pub wer:      f64,
    pub passed:   bool,
}

impl EvalRecord {
    pub fn new(
        run:      usize,
        samples:  usize,
        failures: usize,
        cer:      f64,
        wer:      f64,
        passed:   bool,
    ) -> Self {
        Self { run, samples, failures, cer, wer, passed }
    }
}

/// Appends evaluation results to a CSV file in the model directory.
pub struct EvalLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl EvalLogger {
    /// Create a logger for the given model directory.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(model_dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = model_dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating {}", dir.display()))?;

        let csv_path = dir.join("eval_history.csv");

        // Header only on first use, so runs accumulate across
        // invocations of the evaluate stage.
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "run,samples,failures,cer,wer,passed")?;
            tracing::debug!("created evaluation log {}", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// 1-based number for the next run, counting rows already logged.
    pub fn next_run(&self) -> Result<usize> {
        let text = fs::read_to_string(&self.csv_path)
            .with_context(|| format!("reading {}", self.csv_path.display()))?;
        Ok(text.lines().skip(1).filter(|l| !l.trim().is_empty()).count() + 1)
    }

    /// Append one run's results as a new CSV row.
    pub fn log(&self, r: &EvalRecord) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("opening {}", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{},{},{:.6},{:.6},{}",
            r.run, r.samples, r.failures, r.cer, r.wer, r.passed,
        )?;

        tracing::debug!(
            "logged evaluation run {}: cer={:.4}, wer={:.4}, passed={}",
            r.run,
            r.cer,
            r.wer,
            r.passed,
        );
        Ok(())
    }

    /// Path to the history CSV.
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
