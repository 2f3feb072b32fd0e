// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Each pipeline stage is its own subcommand so stages can be
// re-run independently:
//   generate-bank, collect, preprocess, convert, build-vocab,
//   train, evaluate, infer
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Commands;

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "mathsheet-ocr",
    version = "0.1.0",
    about = "Data pipeline for a handwritten-math transcription model: \
             collect, normalize, convert, tokenize, then train and score."
)]
pub struct Cli {
    /// The pipeline stage to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::GenerateBank(args) => {
                use crate::application::generate_bank_use_case::GenerateBankUseCase;
                GenerateBankUseCase::new(args.into()).execute()
            }
            Commands::Collect(args) => {
                use crate::application::collect_use_case::CollectUseCase;
                CollectUseCase::new(args.into()).execute()
            }
            Commands::Preprocess(args) => {
                use crate::application::preprocess_use_case::PreprocessUseCase;
                PreprocessUseCase::new(args.into()).execute()
            }
            Commands::Convert(args) => {
                use crate::application::convert_use_case::ConvertUseCase;
                ConvertUseCase::new(args.into()).execute()
            }
            Commands::BuildVocab(args) => {
                use crate::application::build_vocab_use_case::BuildVocabUseCase;
                BuildVocabUseCase::new(args.into()).execute()
            }
            Commands::Train(args) => {
                use crate::application::train_use_case::TrainUseCase;
                TrainUseCase::new(args.into()).execute()
            }
            Commands::Evaluate(args) => {
                use crate::application::evaluate_use_case::EvaluateUseCase;
                EvaluateUseCase::new(args.into()).execute()
            }
            Commands::Infer(args) => {
                use crate::application::infer_use_case::InferUseCase;
                InferUseCase::new(args.into()).execute()?;
                Ok(())
            }
        }
    }
}
