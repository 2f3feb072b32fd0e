// ============================================================
// Layer 6 — Pipeline Configuration
// ============================================================
// One JSON file holds every tunable the pipeline stages need.
// Each stage receives its settings explicitly from this struct
// (or a CLI override); nothing reads a process-wide constant.
//
// Sections:
//   data       — image_size: canvas edge used by the preprocessor
//                max_length: token budget advisory for labels
//   evaluation — target_cer: pass/fail threshold (inclusive)
//                worst_k:    how many worst samples to report
//   model      — backend: command invoked for train/predict
//                dir:     where the backend keeps its artifacts
//   training   — opaque hyperparameters forwarded verbatim to the
//                backend's train command, sorted by key
//
// Example config.json:
//   {
//     "data":       { "image_size": 384, "max_length": 128 },
//     "evaluation": { "target_cer": 0.1, "worst_k": 10 },
//     "model":      { "backend": "mathsheet-backend", "dir": "model" },
//     "training":   { "batch_size": 8, "epochs": 30 }
//   }
//
// Missing file or missing keys fall back to the defaults below,
// so a fresh checkout runs without writing any config at all.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// Settings shared by the image/label stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Edge length of the square canvas images are normalized onto
    pub image_size: u32,

    /// Labels encoding to more than this many tokens are flagged
    /// (advisory only) when the vocabulary is built
    pub max_length: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { image_size: 384, max_length: 128 }
    }
}

/// Settings for the evaluation harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Aggregate CER at or below this value passes
    pub target_cer: f64,

    /// Number of worst-scoring samples listed in the report
    pub worst_k: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self { target_cer: 0.10, worst_k: 10 }
    }
}

/// The external model collaborator: a command we spawn, and the
/// directory where it reads/writes its artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Program invoked as `<backend> train …` / `<backend> predict …`
    pub backend: PathBuf,

    /// Model artifact directory (also holds eval_history.csv)
    pub dir: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: PathBuf::from("mathsheet-backend"),
            dir:     PathBuf::from("model"),
        }
    }
}

/// Everything the pipeline stages can be configured with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub data:       DataConfig,
    pub evaluation: EvaluationConfig,
    pub model:      ModelConfig,

    /// Opaque training hyperparameters. Kept ordered so the flag
    /// list handed to the backend is stable run to run.
    pub training: BTreeMap<String, serde_json::Value>,
}

impl PipelineConfig {
    /// Read a config file. Keys absent from the JSON keep their
    /// default values.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("parsing config {}", path.display()))
    }

    /// Like [`load`](Self::load), but a missing file yields the
    /// documented defaults instead of an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            tracing::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("writing config {}", path.display()))?;
        tracing::debug!("saved config to {}", path.display());
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.data.image_size, 384);
        assert_eq!(cfg.data.max_length, 128);
        assert!((cfg.evaluation.target_cer - 0.10).abs() < 1e-12);
        assert_eq!(cfg.evaluation.worst_k, 10);
        assert_eq!(cfg.model.dir, PathBuf::from("model"));
        assert!(cfg.training.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let tmp  = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");

        let mut cfg = PipelineConfig::default();
        cfg.data.image_size = 256;
        cfg.training
            .insert("epochs".to_string(), serde_json::json!(30));
        cfg.save(&path).unwrap();

        let loaded = PipelineConfig::load(&path).unwrap();
        assert_eq!(loaded.data.image_size, 256);
        assert_eq!(loaded.training["epochs"], serde_json::json!(30));
        // untouched sections keep their defaults
        assert_eq!(loaded.evaluation.worst_k, 10);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let tmp  = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{ "data": { "image_size": 512 } }"#).unwrap();

        let cfg = PipelineConfig::load(&path).unwrap();
        assert_eq!(cfg.data.image_size, 512);
        // sibling key inside the same section still defaulted
        assert_eq!(cfg.data.max_length, 128);
        assert!((cfg.evaluation.target_cer - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let tmp = TempDir::new().unwrap();
        let cfg = PipelineConfig::load_or_default(&tmp.path().join("absent.json")).unwrap();
        assert_eq!(cfg.data.image_size, 384);
    }
}
