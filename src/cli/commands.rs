// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// One subcommand per pipeline stage, with all configurable
// flags. Stages read/write well-known paths by default, so a
// full run is just the subcommands in order:
//
//   generate-bank → collect → preprocess → convert → build-vocab
//   → train → evaluate → infer
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, PathBuf, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::build_vocab_use_case::BuildVocabConfig;
use crate::application::collect_use_case::CollectConfig;
use crate::application::convert_use_case::ConvertConfig;
use crate::application::evaluate_use_case::EvaluateConfig;
use crate::application::generate_bank_use_case::GenerateBankConfig;
use crate::application::infer_use_case::InferConfig;
use crate::application::preprocess_use_case::PreprocessConfig;
use crate::application::train_use_case::TrainConfig;
use crate::domain::category::Category;

/// The pipeline stages available as subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate arithmetic problems into the question bank
    GenerateBank(GenerateBankArgs),

    /// Collect raw worksheet images into labeled train/val splits
    Collect(CollectArgs),

    /// Normalize collected images in place
    Preprocess(PreprocessArgs),

    /// Convert the splits into a renumbered corpus
    Convert(ConvertArgs),

    /// Build (or reuse) the BPE vocabulary from the corpus
    BuildVocab(BuildVocabArgs),

    /// Train the model through the external backend
    Train(TrainArgs),

    /// Score the trained model on the validation split
    Evaluate(EvaluateArgs),

    /// Transcribe a single image with the trained model
    Infer(InferArgs),
}

/// Arguments for the `generate-bank` command
#[derive(Args, Debug)]
pub struct GenerateBankArgs {
    /// Question bank file to create or extend
    #[arg(long, default_value = "question_bank.json")]
    pub bank_path: PathBuf,

    /// Category to generate: addition or multiplication
    #[arg(long, default_value = "addition")]
    pub category: Category,

    /// Number of problems to generate
    #[arg(long, default_value_t = 20)]
    pub count: usize,

    /// Smallest operand value
    #[arg(long, default_value_t = 0)]
    pub low: i64,

    /// Largest operand value
    #[arg(long, default_value_t = 9)]
    pub high: i64,

    /// Sample operand pairs randomly instead of cycling in order
    #[arg(long)]
    pub randomize: bool,

    /// Seed for --randomize; omit for a fresh draw every run
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<GenerateBankArgs> for GenerateBankConfig {
    fn from(a: GenerateBankArgs) -> Self {
        GenerateBankConfig {
            bank_path: a.bank_path,
            category:  a.category,
            count:     a.count,
            low:       a.low,
            high:      a.high,
            randomize: a.randomize,
            seed:      a.seed,
        }
    }
}

/// Arguments for the `collect` command
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Question bank the labels are resolved against
    #[arg(long, default_value = "question_bank.json")]
    pub bank_path: PathBuf,

    /// Directory of raw images named category_id_timestamp.png
    #[arg(long, default_value = "data/raw")]
    pub raw_dir: PathBuf,

    /// Output directory for the train/ and val/ splits
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Shuffle seed; the same seed over the same images always
    /// reproduces the same split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of samples assigned to the training split
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,
}

impl From<CollectArgs> for CollectConfig {
    fn from(a: CollectArgs) -> Self {
        CollectConfig {
            bank_path:      a.bank_path,
            raw_dir:        a.raw_dir,
            data_dir:       a.data_dir,
            seed:           a.seed,
            train_fraction: a.train_fraction,
        }
    }
}

/// Arguments for the `preprocess` command
#[derive(Args, Debug)]
pub struct PreprocessArgs {
    /// Pipeline configuration file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Directory holding the train/ and val/ splits
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Canvas size override (defaults to the configured value)
    #[arg(long)]
    pub image_size: Option<u32>,
}

impl From<PreprocessArgs> for PreprocessConfig {
    fn from(a: PreprocessArgs) -> Self {
        PreprocessConfig {
            config_path: a.config,
            data_dir:    a.data_dir,
            image_size:  a.image_size,
        }
    }
}

/// Arguments for the `convert` command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Directory holding the train/ and val/ splits
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Output directory for the renumbered corpus
    #[arg(long, default_value = "dataset")]
    pub dataset_dir: PathBuf,
}

impl From<ConvertArgs> for ConvertConfig {
    fn from(a: ConvertArgs) -> Self {
        ConvertConfig {
            data_dir:    a.data_dir,
            dataset_dir: a.dataset_dir,
        }
    }
}

/// Arguments for the `build-vocab` command
#[derive(Args, Debug)]
pub struct BuildVocabArgs {
    /// Pipeline configuration file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Corpus directory; the tokenizer is saved next to it
    #[arg(long, default_value = "dataset")]
    pub dataset_dir: PathBuf,

    /// Target vocabulary size, reserved tokens included
    #[arg(long, default_value_t = 8000)]
    pub vocab_size: usize,

    /// Token budget override for the advisory report
    #[arg(long)]
    pub max_length: Option<usize>,
}

impl From<BuildVocabArgs> for BuildVocabConfig {
    fn from(a: BuildVocabArgs) -> Self {
        BuildVocabConfig {
            config_path: a.config,
            dataset_dir: a.dataset_dir,
            vocab_size:  a.vocab_size,
            max_length:  a.max_length,
        }
    }
}

/// Arguments for the `train` command
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Pipeline configuration file (backend command, training flags)
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Directory holding the train/ and val/ splits
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            config_path: a.config,
            data_dir:    a.data_dir,
        }
    }
}

/// Arguments for the `evaluate` command
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Pipeline configuration file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Directory holding the val/ split to score against
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Pass/fail threshold override (inclusive)
    #[arg(long)]
    pub target_cer: Option<f64>,

    /// Override for how many worst samples to report
    #[arg(long)]
    pub worst_k: Option<usize>,
}

impl From<EvaluateArgs> for EvaluateConfig {
    fn from(a: EvaluateArgs) -> Self {
        EvaluateConfig {
            config_path: a.config,
            data_dir:    a.data_dir,
            target_cer:  a.target_cer,
            worst_k:     a.worst_k,
        }
    }
}

/// Arguments for the `infer` command
#[derive(Args, Debug)]
pub struct InferArgs {
    /// Image to transcribe
    pub image: PathBuf,

    /// Pipeline configuration file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,
}

impl From<InferArgs> for InferConfig {
    fn from(a: InferArgs) -> Self {
        InferConfig {
            config_path: a.config,
            image:       a.image,
        }
    }
}
