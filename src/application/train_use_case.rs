// ============================================================
// Layer 2 — Train Use Case
// ============================================================
// Hands the collected splits to the external model backend:
//
//   Step 1: Load the pipeline configuration           (Layer 6)
//   Step 2: Check the training split exists           (here)
//   Step 3: Spawn `<backend> train …`                 (Layer 5)
//
// The backend owns the model architecture and the training loop;
// this side only assembles the command and checks the exit
// status. Training hyperparameters from the config are forwarded
// verbatim as flags.

use anyhow::Result;
use std::path::PathBuf;

use crate::domain::errors::StageError;
use crate::domain::traits::ModelTrainer;
use crate::infra::config::PipelineConfig;
use crate::ml::bridge::BackendBridge;

// ─── Configuration ───────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub config_path: PathBuf,
    pub data_dir:    PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config.json"),
            data_dir:    PathBuf::from("data"),
        }
    }
}

// ─── TrainUseCase ────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load the pipeline configuration ──────────────────────────
        let pipeline = PipelineConfig::load_or_default(&cfg.config_path)?;

        // ── Step 2: Check the training split exists ──────────────────────────
        if !cfg.data_dir.join("train").join("labels.txt").is_file() {
            return Err(StageError::setup(format!(
                "no training split under {}; run collect first",
                cfg.data_dir.display()
            ))
            .into());
        }

        // ── Step 3: Spawn the backend ────────────────────────────────────────
        let bridge = BackendBridge::new(&pipeline.model.backend, &pipeline.model.dir)
            .with_training_options(pipeline.training.clone());
        bridge.train(&cfg.data_dir)?;

        println!(
            "Training finished; model artifacts in {}",
            pipeline.model.dir.display(),
        );
        Ok(())
    }
}
