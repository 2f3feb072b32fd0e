// ============================================================
// Layer 3 — Stage Errors
// ============================================================
// Every pipeline stage fails in one of five ways, and the class
// decides what happens next:
//
//   Setup             → stage aborts before writing anything
//   Parse             → item skipped, counted, stage continues
//   Validation        → item skipped, counted, stage continues
//   Io                → item skipped, counted, stage continues
//   MetricComputation → aggregate metric aborts (inputs no
//                       longer line up, which indicates a bug
//                       upstream rather than bad data)
//
// Per-item errors are never silently discarded: each stage
// tallies them in a SkipCounter and prints the counts in its
// completion summary.

use thiserror::Error;

/// Failure classes shared by every pipeline stage.
#[derive(Debug, Error)]
pub enum StageError {
    /// A required file or directory is absent.
    #[error("setup: {0}")]
    Setup(String),

    /// A filename or label row does not match the expected shape.
    #[error("parse: {0}")]
    Parse(String),

    /// An item is well-formed but fails a domain rule
    /// (e.g. no matching question bank entry).
    #[error("validation: {0}")]
    Validation(String),

    /// An item could not be read or decoded.
    #[error("io: {0}")]
    Io(String),

    /// Reference and hypothesis lists are misaligned.
    #[error("metric computation: {0}")]
    MetricComputation(String),
}

impl StageError {
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    pub fn metric(message: impl Into<String>) -> Self {
        Self::MetricComputation(message.into())
    }

    /// True for classes that abort the stage instead of one item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Setup(_) | Self::MetricComputation(_))
    }
}

// ─── SkipCounter ──────────────────────────────────────────────────────────────

/// Tally of per-item skips, reported in stage-completion summaries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SkipCounter {
    pub parse:      usize,
    pub validation: usize,
    pub io:         usize,
}

impl SkipCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one skipped item under its class.
    /// Fatal classes are not per-item and are not counted here.
    pub fn record(&mut self, err: &StageError) {
        match err {
            StageError::Parse(_)      => self.parse += 1,
            StageError::Validation(_) => self.validation += 1,
            StageError::Io(_)         => self.io += 1,
            _ => {}
        }
    }

    pub fn total(&self) -> usize {
        self.parse + self.validation + self.io
    }

    /// One-line summary for stage completion logs,
    /// e.g. "3 skipped (1 parse, 2 validation, 0 io)".
    pub fn summary(&self) -> String {
        format!(
            "{} skipped ({} parse, {} validation, {} io)",
            self.total(),
            self.parse,
            self.validation,
            self.io
        )
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
