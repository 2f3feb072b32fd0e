// ============================================================
// Layer 2 — Collect Use Case
// ============================================================
// Turns a directory of raw worksheet photos into labeled
// train/val splits:
//
//   Step 1: Load the question bank                    (Layer 4)
//   Step 2: Scan, resolve and split the raw images    (Layer 4)
//
// Filenames carry the sample identity (`category_id_timestamp`);
// the label always comes from the bank, never from the image.

use anyhow::Result;
use std::path::PathBuf;

use crate::data::bank::load_bank;
use crate::data::collector::Collector;

// ─── Configuration ───────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct CollectConfig {
    pub bank_path:      PathBuf,
    pub raw_dir:        PathBuf,
    pub data_dir:       PathBuf,
    pub seed:           u64,
    pub train_fraction: f64,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            bank_path:      PathBuf::from("question_bank.json"),
            raw_dir:        PathBuf::from("data/raw"),
            data_dir:       PathBuf::from("data"),
            seed:           42,
            train_fraction: 0.8,
        }
    }
}

// ─── CollectUseCase ──────────────────────────────────────────────────────────
pub struct CollectUseCase {
    config: CollectConfig,
}

impl CollectUseCase {
    pub fn new(config: CollectConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load the question bank ───────────────────────────────────
        let bank = load_bank(&cfg.bank_path)?;
        tracing::info!(
            "loaded question bank {} ({} problems)",
            cfg.bank_path.display(),
            bank.total_problems(),
        );
        for (category, problems) in bank.iter() {
            tracing::debug!("bank category {category}: {} problems", problems.len());
        }

        // ── Step 2: Collect and split ────────────────────────────────────────
        let collector = Collector::new(&bank, cfg.seed, cfg.train_fraction);
        let stats     = collector.collect(&cfg.raw_dir, &cfg.data_dir)?;

        println!(
            "Collected {} of {} images: {} train, {} val",
            stats.usable, stats.scanned, stats.train, stats.val,
        );
        if stats.skips.total() > 0 {
            println!("Skipped: {}", stats.skips.summary());
        }
        Ok(())
    }
}
