// ============================================================
// Layer 2 — Infer Use Case
// ============================================================
// One image in, one predicted LaTeX string out. Stateless: every
// call spawns a fresh `<backend> predict …` and returns whatever
// it prints. Backend and image errors surface to the caller
// unchanged.

use anyhow::Result;
use std::path::PathBuf;

use crate::domain::traits::Transcriber;
use crate::infra::config::PipelineConfig;
use crate::ml::bridge::BackendBridge;

// ─── Configuration ───────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct InferConfig {
    pub config_path: PathBuf,
    pub image:       PathBuf,
}

// ─── InferUseCase ────────────────────────────────────────────────────────────
pub struct InferUseCase {
    config: InferConfig,
}

impl InferUseCase {
    pub fn new(config: InferConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<String> {
        let cfg = &self.config;

        let pipeline = PipelineConfig::load_or_default(&cfg.config_path)?;
        let bridge   = BackendBridge::new(&pipeline.model.backend, &pipeline.model.dir);

        tracing::info!("transcribing {}", cfg.image.display());
        let text = bridge.transcribe(&cfg.image)?;

        println!("Recognized text: {text}");
        Ok(text)
    }
}
