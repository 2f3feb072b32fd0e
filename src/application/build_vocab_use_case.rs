// ============================================================
// Layer 2 — Build Vocab Use Case
// ============================================================
// Builds (or reuses) the BPE vocabulary shared by the backend's
// training and decoding:
//
//   Step 1: Load or train the tokenizer                (Layer 6)
//   Step 2: Report labels over the token budget        (Layer 6)
//
// The artifact lives at <dataset_dir>/tokenizer.json next to the
// corpus it was trained on.

use anyhow::Result;
use std::path::PathBuf;

use crate::infra::config::PipelineConfig;
use crate::infra::tokenizer_store::{over_budget_lines, TokenizerStore};

// ─── Configuration ───────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct BuildVocabConfig {
    pub config_path: PathBuf,
    pub dataset_dir: PathBuf,
    pub vocab_size:  usize,
    /// Per-invocation override of the configured token budget.
    pub max_length:  Option<usize>,
}

impl Default for BuildVocabConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("config.json"),
            dataset_dir: PathBuf::from("dataset"),
            vocab_size:  8000,
            max_length:  None,
        }
    }
}

// ─── BuildVocabUseCase ───────────────────────────────────────────────────────
pub struct BuildVocabUseCase {
    config: BuildVocabConfig,
}

impl BuildVocabUseCase {
    pub fn new(config: BuildVocabConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        let pipeline   = PipelineConfig::load_or_default(&cfg.config_path)?;
        let max_length = cfg.max_length.unwrap_or(pipeline.data.max_length);

        let equation_files = [
            cfg.dataset_dir.join("data").join("train_equations.txt"),
            cfg.dataset_dir.join("data").join("val_equations.txt"),
        ];

        // ── Step 1: Load or train ────────────────────────────────────────────
        let store = TokenizerStore::new(&cfg.dataset_dir);
        let (tokenizer, built) = store.load_or_build(&equation_files, cfg.vocab_size)?;

        let vocab = tokenizer.get_vocab_size(true);
        if built {
            println!(
                "Trained vocabulary ({} tokens) -> {}",
                vocab,
                store.tokenizer_path().display(),
            );
        } else {
            println!(
                "Vocabulary already exists ({} tokens): {}",
                vocab,
                store.tokenizer_path().display(),
            );
        }

        // ── Step 2: Token budget advisory ────────────────────────────────────
        let over = over_budget_lines(&tokenizer, &equation_files, max_length)?;
        if over > 0 {
            println!(
                "Warning: {} labels encode to more than {} tokens and will be truncated by the backend",
                over, max_length,
            );
        } else {
            println!("All labels fit within {} tokens", max_length);
        }
        Ok(())
    }
}
