// ============================================================
// Layer 2 — Generate Bank Use Case
// ============================================================
// Fills one category of the question bank with locally generated
// arithmetic problems:
//
//   Step 1: Load the existing bank (or start empty)   (Layer 4)
//   Step 2: Generate problems from the category rule  (Layer 4)
//   Step 3: Replace the category and save the bank    (Layer 4)
//
// Only arithmetic categories can be generated here; integral
// problems are authored externally and arrive in the bank file
// by other means.

use anyhow::Result;
use std::path::PathBuf;

use crate::data::bank::{generate_problems, load_bank, save_bank, BankSpec};
use crate::domain::category::Category;
use crate::domain::question::QuestionBank;

// ─── Configuration ───────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct GenerateBankConfig {
    pub bank_path: PathBuf,
    pub category:  Category,
    pub count:     usize,
    pub low:       i64,
    pub high:      i64,
    pub randomize: bool,
    pub seed:      Option<u64>,
}

impl Default for GenerateBankConfig {
    fn default() -> Self {
        Self {
            bank_path: PathBuf::from("question_bank.json"),
            category:  Category::Addition,
            count:     20,
            low:       0,
            high:      9,
            randomize: false,
            seed:      None,
        }
    }
}

// ─── GenerateBankUseCase ─────────────────────────────────────────────────────
pub struct GenerateBankUseCase {
    config: GenerateBankConfig,
}

impl GenerateBankUseCase {
    pub fn new(config: GenerateBankConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load or start a bank ─────────────────────────────────────
        // Other categories already in the file are preserved.
        let mut bank = if cfg.bank_path.is_file() {
            load_bank(&cfg.bank_path)?
        } else {
            QuestionBank::new()
        };

        // ── Step 2: Generate the problems ────────────────────────────────────
        let spec = BankSpec {
            category:  cfg.category,
            count:     cfg.count,
            low:       cfg.low,
            high:      cfg.high,
            randomize: cfg.randomize,
            seed:      cfg.seed,
        };
        let problems = generate_problems(&spec)?;
        tracing::info!(
            "generated {} {} problems over [{}, {}]",
            problems.len(),
            cfg.category,
            cfg.low,
            cfg.high,
        );

        // ── Step 3: Replace the category and save ────────────────────────────
        bank.set_category(cfg.category, problems);
        save_bank(&bank, &cfg.bank_path)?;

        println!(
            "Wrote {} {} problems to {} ({} problems total)",
            cfg.count,
            cfg.category,
            cfg.bank_path.display(),
            bank.total_problems(),
        );
        Ok(())
    }
}
