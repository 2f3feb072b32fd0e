// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// Scores the trained model against the validation split:
//
//   Step 1: Load the pipeline configuration           (Layer 6)
//   Step 2: Run the harness over <data_dir>/val       (Layer 5)
//   Step 3: Print the report                          (here)
//   Step 4: Append the run to eval_history.csv        (Layer 6)
//
// A failed threshold is a printed verdict, not an error: only
// setup problems (or a misaligned metric computation) abort.

use anyhow::Result;
use std::path::PathBuf;

use crate::infra::config::PipelineConfig;
use crate::infra::metrics::{EvalLogger, EvalRecord};
use crate::ml::bridge::BackendBridge;
use crate::ml::evaluator::{EvaluationReport, Evaluator};

// ─── Configuration ───────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    pub config_path: PathBuf,
    pub data_dir:    PathBuf,
    /// Per-invocation overrides of the configured thresholds.
    pub target_cer:  Option<f64>,
    pub worst_k:     Option<usize>,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config.json"),
            data_dir:    PathBuf::from("data"),
            target_cer:  None,
            worst_k:     None,
        }
    }
}

// ─── EvaluateUseCase ─────────────────────────────────────────────────────────
pub struct EvaluateUseCase {
    config: EvaluateConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvaluateConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load the pipeline configuration ──────────────────────────
        let pipeline   = PipelineConfig::load_or_default(&cfg.config_path)?;
        let target_cer = cfg.target_cer.unwrap_or(pipeline.evaluation.target_cer);
        let worst_k    = cfg.worst_k.unwrap_or(pipeline.evaluation.worst_k);

        // ── Step 2: Score the validation split ───────────────────────────────
        let bridge    = BackendBridge::new(&pipeline.model.backend, &pipeline.model.dir);
        let evaluator = Evaluator::new(target_cer, worst_k);
        let report    = evaluator.evaluate(&bridge, &cfg.data_dir.join("val"))?;

        // ── Step 3: Print the report ─────────────────────────────────────────
        print_report(&report);

        // ── Step 4: Append to the run history ────────────────────────────────
        let logger = EvalLogger::new(&pipeline.model.dir)?;
        let record = EvalRecord::new(
            logger.next_run()?,
            report.samples,
            report.failures,
            report.cer,
            report.wer,
            report.passed,
        );
        logger.log(&record)?;
        tracing::info!("run recorded in {}", logger.csv_path().display());
        Ok(())
    }
}

fn print_report(report: &EvaluationReport) {
    println!();
    println!("{}", "=".repeat(60));
    println!("EVALUATION RESULTS");
    println!("{}", "=".repeat(60));
    println!(
        "Character Error Rate (CER): {:.4} ({:.2}%)",
        report.cer,
        report.cer * 100.0,
    );
    println!(
        "Word Error Rate (WER): {:.4} ({:.2}%)",
        report.wer,
        report.wer * 100.0,
    );
    println!("Total samples: {}", report.samples);
    println!("Samples with errors: {}", report.imperfect);
    if report.failures > 0 {
        println!("Prediction failures: {}", report.failures);
    }
    if report.malformed_rows > 0 {
        println!("Malformed label rows: {}", report.malformed_rows);
    }
    println!("{}", "=".repeat(60));

    if !report.worst.is_empty() {
        println!();
        println!("Top {} worst predictions:", report.worst.len());
        for sample in &report.worst {
            println!();
            println!("Image: {}", sample.image);
            println!("  True:  {}", sample.reference);
            println!("  Pred:  {}", sample.hypothesis);
            println!("  CER:   {:.4}", sample.cer);
        }
    }

    println!();
    if report.passed {
        println!(
            "Model meets target CER of {:.4} ({:.2}%)",
            report.target_cer,
            report.target_cer * 100.0,
        );
    } else {
        println!(
            "Model CER ({:.4}) is above target ({:.4})",
            report.cer, report.target_cer,
        );
        println!("Consider training for more epochs, adding more data, or adjusting the learning rate");
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::StageError;
    use std::fs;
    use tempfile::TempDir;

    // An unlaunchable backend fails every sample; with nothing
    // scored, the aggregate computation must refuse to produce a
    // number rather than report a hollow pass.
    #[test]
    fn test_unreachable_backend_fails_metric_computation() {
        let tmp      = TempDir::new().unwrap();
        let data_dir = tmp.path().join("data");
        fs::create_dir_all(data_dir.join("val/images")).unwrap();
        fs::write(data_dir.join("val/labels.txt"), "a.png\t7").unwrap();

        let config_path = tmp.path().join("config.json");
        let mut pipeline = PipelineConfig::default();
        pipeline.model.backend = PathBuf::from("/nonexistent/backend-for-tests");
        pipeline.model.dir     = tmp.path().join("model");
        pipeline.save(&config_path).unwrap();

        let err = EvaluateUseCase::new(EvaluateConfig {
            config_path,
            data_dir,
            ..Default::default()
        })
        .execute()
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StageError>(),
            Some(StageError::MetricComputation(_))
        ));
        // nothing was appended to the history on a fatal run
        assert!(!tmp.path().join("model/eval_history.csv").exists());
    }
}
