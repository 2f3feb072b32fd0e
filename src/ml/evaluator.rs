// ============================================================
// Layer 5 — Evaluation Harness
// ============================================================
// Runs a trained model over the validation split and scores it:
//
//   1. Read val labels (image<TAB>reference)
//   2. Transcribe each image through the Transcriber trait;
//      a failed sample is warned about, counted and excluded
//      from scoring, never fatal to the run
//   3. Aggregate CER/WER over the scored pairs
//   4. Rank imperfect samples by per-sample CER, keep the worst k
//   5. Pass when aggregate CER <= target (inclusive)
//
// The harness only knows the Transcriber trait, so tests drive
// it with scripted fakes instead of a real backend.

use anyhow::Result;
use std::path::Path;

use crate::data::labels::read_label_file;
use crate::domain::errors::StageError;
use crate::domain::traits::Transcriber;
use crate::ml::metrics::{corpus_cer, corpus_wer, sample_cer};

/// One scored validation sample.
#[derive(Debug, Clone)]
pub struct ScoredSample {
    pub image:      String,
    pub reference:  String,
    pub hypothesis: String,
    /// Per-sample rate, used for ranking only.
    pub cer:        f64,
}

/// The harness result.
#[derive(Debug)]
pub struct EvaluationReport {
    /// Samples that produced a scored prediction.
    pub samples:        usize,
    /// Samples excluded because transcription failed.
    pub failures:       usize,
    /// Label rows that could not be parsed.
    pub malformed_rows: usize,
    /// Scored samples with a nonzero per-sample CER.
    pub imperfect:      usize,
    /// Aggregate rates over all scored samples.
    pub cer:            f64,
    pub wer:            f64,
    pub target_cer:     f64,
    pub passed:         bool,
    /// Imperfect samples, worst first, at most `worst_k`.
    pub worst:          Vec<ScoredSample>,
}

/// Scores any Transcriber against a validation split.
pub struct Evaluator {
    target_cer: f64,
    worst_k:    usize,
}

impl Evaluator {
    pub fn new(target_cer: f64, worst_k: usize) -> Self {
        Self {
            target_cer,
            worst_k,
        }
    }

    /// Evaluate `model` against `<val_dir>/labels.txt` and
    /// `<val_dir>/images/`.
    pub fn evaluate<T: Transcriber>(&self, model: &T, val_dir: &Path) -> Result<EvaluationReport> {
        // ── Step 1: Read the validation labels ────────────────────────────────
        let labels_file = val_dir.join("labels.txt");
        if !labels_file.is_file() {
            return Err(StageError::setup(format!(
                "validation label file {} does not exist",
                labels_file.display()
            ))
            .into());
        }
        let parsed     = read_label_file(&labels_file)?;
        let images_dir = val_dir.join("images");
        tracing::info!("evaluating on {} validation samples", parsed.rows.len());

        // ── Step 2: Transcribe every sample ───────────────────────────────────
        let mut scored   = Vec::with_capacity(parsed.rows.len());
        let mut failures = 0usize;
        for (i, row) in parsed.rows.iter().enumerate() {
            let image = images_dir.join(&row.image);
            match model.transcribe(&image) {
                Ok(hypothesis) => {
                    let cer = sample_cer(&row.label, &hypothesis);
                    scored.push(ScoredSample {
                        image:      row.image.clone(),
                        reference:  row.label.clone(),
                        hypothesis,
                        cer,
                    });
                }
                Err(err) => {
                    tracing::warn!("excluding {}: {err}", row.image);
                    failures += 1;
                }
            }
            if (i + 1) % 10 == 0 {
                tracing::info!("processed {}/{} samples", i + 1, parsed.rows.len());
            }
        }

        // ── Step 3: Aggregate metrics over the scored pairs ───────────────────
        let references: Vec<&str> = scored.iter().map(|s| s.reference.as_str()).collect();
        let hypotheses: Vec<&str> = scored.iter().map(|s| s.hypothesis.as_str()).collect();
        let cer = corpus_cer(&references, &hypotheses)?;
        let wer = corpus_wer(&references, &hypotheses)?;

        // ── Step 4: Rank the imperfect samples ────────────────────────────────
        let mut worst: Vec<ScoredSample> =
            scored.iter().filter(|s| s.cer > 0.0).cloned().collect();
        let imperfect = worst.len();
        worst.sort_by(|a, b| {
            b.cer
                .partial_cmp(&a.cer)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        worst.truncate(self.worst_k);

        let report = EvaluationReport {
            samples: scored.len(),
            failures,
            malformed_rows: parsed.malformed,
            imperfect,
            cer,
            wer,
            target_cer: self.target_cer,
            passed: cer <= self.target_cer,
            worst,
        };
        tracing::info!(
            "evaluation: cer {:.4}, wer {:.4}, {} scored, {} failed, target {:.4} ({})",
            report.cer,
            report.wer,
            report.samples,
            report.failures,
            report.target_cer,
            if report.passed { "pass" } else { "fail" },
        );
        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Transcriber fake: answers from a name→text table, fails on
    /// anything not scripted.
    struct Scripted {
        by_name: HashMap<String, String>,
    }

    impl Scripted {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                by_name: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl Transcriber for Scripted {
        fn transcribe(&self, image: &Path) -> Result<String> {
            let name = image
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            self.by_name
                .get(name)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("scripted failure for {name}"))
        }
    }

    fn val_fixture(rows: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        for (image, _) in rows {
            std::fs::write(dir.path().join("images").join(image), b"img").unwrap();
        }
        let body = rows
            .iter()
            .map(|(image, label)| format!("{image}\t{label}"))
            .collect::<Vec<_>>()
            .join("\n");
        std::fs::write(dir.path().join("labels.txt"), body).unwrap();
        dir
    }

    #[test]
    fn test_report_aggregates_and_ranks() {
        let val = val_fixture(&[("a.png", "12"), ("b.png", "7"), ("c.png", "1+1")]);
        let model = Scripted::new(&[("a.png", "13"), ("b.png", "7")]); // c.png fails

        let report = Evaluator::new(0.10, 10)
            .evaluate(&model, val.path())
            .unwrap();

        assert_eq!(report.samples, 2);
        assert_eq!(report.failures, 1);
        assert_eq!(report.imperfect, 1);
        // aggregate: (1 + 0) edits over (2 + 1) reference chars
        assert!((report.cer - 1.0 / 3.0).abs() < 1e-12);
        assert!(!report.passed);

        assert_eq!(report.worst.len(), 1);
        assert_eq!(report.worst[0].image, "a.png");
        assert_eq!(report.worst[0].cer, 0.5);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 2 edits over 25 chars = 0.08 <= 0.10 passes
        let val = val_fixture(&[("a.png", "aaaaaaaaaaaaaaaaaaaaaaaaa")]);
        let model = Scripted::new(&[("a.png", "aaaaaaaaaaaaaaaaaaaaaaabb")]);
        let report = Evaluator::new(0.10, 10).evaluate(&model, val.path()).unwrap();
        assert!((report.cer - 0.08).abs() < 1e-12);
        assert!(report.passed);

        // exactly on target still passes
        let val = val_fixture(&[("a.png", "aaaaaaaaaa")]);
        let model = Scripted::new(&[("a.png", "aaaaaaaaab")]);
        let report = Evaluator::new(0.10, 10).evaluate(&model, val.path()).unwrap();
        assert!((report.cer - 0.10).abs() < 1e-12);
        assert!(report.passed);

        // 3 edits over 25 chars = 0.12 > 0.10 fails
        let val = val_fixture(&[("a.png", "aaaaaaaaaaaaaaaaaaaaaaaaa")]);
        let model = Scripted::new(&[("a.png", "aaaaaaaaaaaaaaaaaaaaaabbb")]);
        let report = Evaluator::new(0.10, 10).evaluate(&model, val.path()).unwrap();
        assert!((report.cer - 0.12).abs() < 1e-12);
        assert!(!report.passed);
    }

    #[test]
    fn test_worst_list_respects_k() {
        let rows: Vec<(String, String)> = (0..5)
            .map(|i| (format!("s{i}.png"), "aaaa".to_string()))
            .collect();
        let row_refs: Vec<(&str, &str)> =
            rows.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        let val = val_fixture(&row_refs);

        // s0 worst (4 edits), s4 best (0 edits)
        let model = Scripted::new(&[
            ("s0.png", "bbbb"),
            ("s1.png", "bbba"),
            ("s2.png", "bbaa"),
            ("s3.png", "baaa"),
            ("s4.png", "aaaa"),
        ]);
        let report = Evaluator::new(0.10, 2).evaluate(&model, val.path()).unwrap();

        assert_eq!(report.imperfect, 4);
        assert_eq!(report.worst.len(), 2);
        assert_eq!(report.worst[0].image, "s0.png");
        assert_eq!(report.worst[1].image, "s1.png");
    }

    #[test]
    fn test_missing_labels_is_setup_error() {
        let dir = TempDir::new().unwrap();
        let model = Scripted::new(&[]);
        let err = Evaluator::new(0.10, 10)
            .evaluate(&model, dir.path())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StageError>(),
            Some(StageError::Setup(_))
        ));
    }

    #[test]
    fn test_all_failures_cannot_be_scored() {
        let val = val_fixture(&[("a.png", "12")]);
        let model = Scripted::new(&[]); // everything fails
        let err = Evaluator::new(0.10, 10)
            .evaluate(&model, val.path())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StageError>(),
            Some(StageError::MetricComputation(_))
        ));
    }
}
