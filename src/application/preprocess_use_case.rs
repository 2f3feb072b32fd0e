// ============================================================
// Layer 2 — Preprocess Use Case
// ============================================================
// Normalizes every collected image in place so the backend sees
// uniform inputs: RGB, shrunk to fit, centered on a white square
// canvas. Running it twice changes nothing.

use anyhow::Result;
use std::path::PathBuf;

use crate::data::preprocessor::Preprocessor;
use crate::infra::config::PipelineConfig;

// ─── Configuration ───────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    pub config_path: PathBuf,
    pub data_dir:    PathBuf,
    /// Per-invocation override of the configured canvas size.
    pub image_size:  Option<u32>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config.json"),
            data_dir:    PathBuf::from("data"),
            image_size:  None,
        }
    }
}

// ─── PreprocessUseCase ───────────────────────────────────────────────────────
pub struct PreprocessUseCase {
    config: PreprocessConfig,
}

impl PreprocessUseCase {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        let pipeline   = PipelineConfig::load_or_default(&cfg.config_path)?;
        let image_size = cfg.image_size.unwrap_or(pipeline.data.image_size);

        let preprocessor = Preprocessor::new(image_size);
        let stats        = preprocessor.run(&cfg.data_dir)?;

        println!(
            "Normalized {} images to {}x{}",
            stats.processed, image_size, image_size,
        );
        if stats.skips.total() > 0 {
            println!("Skipped: {}", stats.skips.summary());
        }
        Ok(())
    }
}
