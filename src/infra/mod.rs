// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns shared by several pipeline stages:
//
//   config.rs          — Pipeline configuration
//                        Loads and saves config.json: image size,
//                        token budget, evaluation threshold, and
//                        the backend command with its opaque
//                        training options. Every stage receives
//                        its settings explicitly from here (or a
//                        CLI override); there are no process-wide
//                        constants.
//
//   tokenizer_store.rs — Vocabulary persistence
//                        Trains a byte-level BPE tokenizer on the
//                        converted corpus if none exists, or loads
//                        a previously saved one. Ensures training
//                        and inference share one vocabulary.
//
//   metrics.rs         — Evaluation run log
//                        Appends one CSV row per evaluation run so
//                        model quality can be compared across
//                        training iterations.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Pipeline configuration loading and saving
pub mod config;

/// Tokenizer training, saving, and loading
pub mod tokenizer_store;

/// Evaluation history CSV logger
pub mod metrics;
