// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The pipeline never talks to the neural model directly; it
// talks to the traits below. The concrete implementation lives
// in the ml layer and shells out to the training backend, while
// tests substitute scripted fakes.

use anyhow::Result;
use std::path::Path;

// ─── Transcriber ──────────────────────────────────────────────────────────────
/// Any component that can turn one worksheet image into text.
///
/// Implementations:
///   - BackendBridge → spawns the external model's predict command
///   - test fakes    → return scripted transcriptions
pub trait Transcriber {
    /// Transcribe a single image to its LaTeX/plain-text reading.
    /// Load and prediction failures are both reported through the
    /// returned error; callers decide whether one failure is fatal.
    fn transcribe(&self, image: &Path) -> Result<String>;
}

// ─── ModelTrainer ─────────────────────────────────────────────────────────────
/// Any component that can fit a model on a prepared data directory.
///
/// Implementations:
///   - BackendBridge → spawns the external model's train command
pub trait ModelTrainer {
    /// Train on the collected splits under `data_dir`. Where the
    /// trained artifacts land is the implementation's business
    /// (the bridge is constructed with its model directory).
    fn train(&self, data_dir: &Path) -> Result<()>;
}
