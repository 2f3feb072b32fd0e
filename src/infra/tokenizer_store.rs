// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Persists the sub-word vocabulary shared by training and
// inference. Built once from the converted corpus, then loaded
// from disk on every later run.
//
// The artifact is a HuggingFace `tokenizer.json`:
//   - byte-level BPE model, `[UNK]` as the unknown fallback
//   - byte-level pre-tokenizer without a prefix space
//   - reserved ids, in this order:
//       0 [PAD]   padding
//       1 [BOS]   sequence start
//       2 [EOS]   sequence end
//       3 [UNK]   unknown-byte fallback
//
// Training is deterministic for a fixed corpus and a fixed
// version of the `tokenizers` crate; it is not guaranteed stable
// across trainer versions. Rebuilding therefore only happens when
// the artifact file is absent.
//
// Reference: Sennrich et al. (2016), "Neural Machine Translation
//            of Rare Words with Subword Units" (the BPE paper)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use tokenizers::{
    decoders::DecoderWrapper,
    models::bpe::{BpeTrainerBuilder, BPE},
    normalizers::NormalizerWrapper,
    pre_tokenizers::byte_level::ByteLevel,
    processors::PostProcessorWrapper,
    AddedToken, Tokenizer, TokenizerBuilder, TokenizerImpl,
};

use crate::domain::errors::StageError;

/// Reserved tokens, in id order (0..=3).
pub const SPECIAL_TOKENS: [&str; 4] = ["[PAD]", "[BOS]", "[EOS]", "[UNK]"];

/// Loads or trains the vocabulary artifact for a dataset directory.
pub struct TokenizerStore {
    /// Directory that holds `tokenizer.json`
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Full path of the vocabulary artifact.
    pub fn tokenizer_path(&self) -> PathBuf {
        self.dir.join("tokenizer.json")
    }

    pub fn exists(&self) -> bool {
        self.tokenizer_path().is_file()
    }

    /// Load the saved tokenizer.
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.tokenizer_path();
        Tokenizer::from_file(&path).map_err(|e| {
            anyhow::anyhow!("cannot load tokenizer {}: {}", path.display(), e)
        })
    }

    /// Return the existing tokenizer, or train one from the given
    /// equations files and save it. The second value reports
    /// whether a build happened.
    ///
    /// An existing artifact is returned as-is even if the corpus
    /// has changed since it was trained; callers who regenerate
    /// the corpus must delete `tokenizer.json` to retrain.
    pub fn load_or_build(
        &self,
        equation_files: &[PathBuf],
        vocab_size:     usize,
    ) -> Result<(Tokenizer, bool)> {
        if self.exists() {
            tracing::info!("using existing tokenizer {}", self.tokenizer_path().display());
            return Ok((self.load()?, false));
        }
        Ok((self.build(equation_files, vocab_size)?, true))
    }

    /// Train a byte-level BPE tokenizer over every line of the
    /// given equations files and save it to `tokenizer.json`.
    fn build(&self, equation_files: &[PathBuf], vocab_size: usize) -> Result<Tokenizer> {
        let lines = corpus_lines(equation_files)?;
        if lines.is_empty() {
            return Err(StageError::setup(
                "no equations found; run convert before building the vocabulary",
            )
            .into());
        }
        tracing::info!(
            "training BPE tokenizer: {} lines, vocab size {}",
            lines.len(),
            vocab_size,
        );

        let mut trainer = BpeTrainerBuilder::new()
            .show_progress(true)
            .vocab_size(vocab_size)
            .special_tokens(
                SPECIAL_TOKENS
                    .iter()
                    .map(|t| AddedToken::from(*t, true))
                    .collect(),
            )
            .build();

        let model = BPE::builder()
            .unk_token("[UNK]".to_string())
            .build()
            .map_err(|e| anyhow::anyhow!("cannot assemble BPE model: {}", e))?;

        // Typed builder so the trainer's model type matches the
        // tokenizer's. The untyped `Tokenizer` wrapper is only for
        // loading a finished artifact.
        let mut tokenizer: TokenizerImpl<
            BPE,
            NormalizerWrapper,
            ByteLevel,
            PostProcessorWrapper,
            DecoderWrapper,
        > = TokenizerBuilder::new()
            .with_model(model)
            .with_normalizer(None)
            .with_pre_tokenizer(Some(ByteLevel::new(false, true, true)))
            .with_post_processor(None)
            .with_decoder(None)
            .build()
            .map_err(|e| anyhow::anyhow!("cannot assemble tokenizer: {}", e))?;

        tokenizer
            .train(&mut trainer, lines.into_iter())
            .map_err(|e| anyhow::anyhow!("tokenizer training failed: {}", e))?;

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        let path = self.tokenizer_path();
        tokenizer
            .save(&path, false)
            .map_err(|e| anyhow::anyhow!("cannot save tokenizer {}: {}", path.display(), e))?;
        tracing::info!("saved tokenizer to {}", path.display());

        // Reload through the untyped wrapper so callers get the
        // same type they would from a plain `load()`.
        self.load()
    }
}

/// Count corpus lines whose encoding exceeds `max_length` tokens.
/// Advisory only; control tokens added at training time are not
/// included in the count.
pub fn over_budget_lines(
    tokenizer:      &Tokenizer,
    equation_files: &[PathBuf],
    max_length:     usize,
) -> Result<usize> {
    let mut over = 0;
    for line in corpus_lines(equation_files)? {
        let encoding = tokenizer
            .encode(line.as_str(), false)
            .map_err(|e| anyhow::anyhow!("cannot encode label: {}", e))?;
        if encoding.get_ids().len() > max_length {
            tracing::debug!(
                "label exceeds {} tokens ({}): {}",
                max_length,
                encoding.get_ids().len(),
                line,
            );
            over += 1;
        }
    }
    Ok(over)
}

/// Gather trimmed, non-empty lines from every file that exists.
/// A missing file is warned about and skipped, matching the
/// stage's tolerance for a split that was never produced.
fn corpus_lines(equation_files: &[PathBuf]) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for path in equation_files {
        if !path.is_file() {
            tracing::warn!("equations file {} not found, skipping", path.display());
            continue;
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading equations file {}", path.display()))?;
        lines.extend(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        );
    }
    Ok(lines)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_corpus(dir: &Path) -> PathBuf {
        let path = dir.join("train_equations.txt");
        fs::write(&path, "$3 + 4$\n$2 \\times 8$\n7\n\\frac{1}{2}\n").unwrap();
        path
    }

    #[test]
    fn test_build_saves_artifact_and_encodes() {
        let tmp    = TempDir::new().unwrap();
        let corpus = write_corpus(tmp.path());
        let store  = TokenizerStore::new(tmp.path());

        let (tokenizer, built) = store.load_or_build(&[corpus], 300).unwrap();
        assert!(built);
        assert!(store.exists());

        let encoding = tokenizer.encode("$3 + 4$", false).unwrap();
        assert!(!encoding.get_ids().is_empty());
    }

    #[test]
    fn test_reserved_token_ids() {
        let tmp    = TempDir::new().unwrap();
        let corpus = write_corpus(tmp.path());
        let store  = TokenizerStore::new(tmp.path());

        let (tokenizer, _) = store.load_or_build(&[corpus], 300).unwrap();
        assert_eq!(tokenizer.token_to_id("[PAD]"), Some(0));
        assert_eq!(tokenizer.token_to_id("[BOS]"), Some(1));
        assert_eq!(tokenizer.token_to_id("[EOS]"), Some(2));
        assert_eq!(tokenizer.token_to_id("[UNK]"), Some(3));
    }

    #[test]
    fn test_existing_artifact_is_not_retrained() {
        let tmp    = TempDir::new().unwrap();
        let corpus = write_corpus(tmp.path());
        let store  = TokenizerStore::new(tmp.path());

        let (_, built) = store.load_or_build(&[corpus.clone()], 300).unwrap();
        assert!(built);

        // second call loads the artifact even though the corpus moved on
        fs::write(&corpus, "totally different\n").unwrap();
        let (tokenizer, built) = store.load_or_build(&[corpus], 300).unwrap();
        assert!(!built);
        assert_eq!(tokenizer.token_to_id("[PAD]"), Some(0));
    }

    #[test]
    fn test_no_corpus_is_setup_error() {
        let tmp   = TempDir::new().unwrap();
        let store = TokenizerStore::new(tmp.path());

        let err = store
            .load_or_build(&[tmp.path().join("absent.txt")], 300)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StageError>(),
            Some(StageError::Setup(_))
        ));
    }

    #[test]
    fn test_over_budget_lines() {
        let tmp    = TempDir::new().unwrap();
        let corpus = write_corpus(tmp.path());
        let store  = TokenizerStore::new(tmp.path());
        let (tokenizer, _) = store.load_or_build(&[corpus], 300).unwrap();

        let check = tmp.path().join("check.txt");
        fs::write(&check, "7\n$3 + 4$ and then some more\n").unwrap();

        // the multi-word line cannot fit in one token; "7" does
        let over = over_budget_lines(&tokenizer, &[check.clone()], 1).unwrap();
        assert_eq!(over, 1);
        // a generous budget flags nothing
        let over = over_budget_lines(&tokenizer, &[check], 1000).unwrap();
        assert_eq!(over, 0);
    }
}
