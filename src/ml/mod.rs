// ============================================================
// Layer 5 — Model Layer
// ============================================================
// All contact with the neural model lives here. The model
// itself is an external collaborator (a separate training
// backend program); this layer spawns it, scores its output
// and never looks inside it.
//
// What's in this layer:
//
//   bridge.rs    — Child-process bridge to the backend.
//                  `train` runs the backend with the opaque
//                  hyperparameter map flattened into flags,
//                  `predict` captures one transcription from
//                  stdout. Implements the domain traits so the
//                  rest of the crate never sees Command.
//
//   metrics.rs   — CER/WER math. Keeps the two normalizations
//                  apart: per-sample rate for ranking, summed
//                  corpus rate for the pass/fail threshold.
//
//   evaluator.rs — Runs any Transcriber over the validation
//                  split and assembles the evaluation report.

/// Child-process bridge to the external training backend
pub mod bridge;

/// Character and word error rate computation
pub mod metrics;

/// Validation harness producing the evaluation report
pub mod evaluator;
