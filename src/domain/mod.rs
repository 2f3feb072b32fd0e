// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums and traits that define the core
// concepts of the pipeline.
//
// Rules for this layer:
//   - NO file I/O or process spawning
//   - NO image or tokenizer framework types
//   - Only plain structs, enums, traits and serde derives
//
// Everything here is cheap to construct and cheap to test.
// The other layers implement the traits and move the data.

// Worksheet categories and their generation rules
pub mod category;

// Failure classes and per-item skip accounting
pub mod errors;

// The question bank: categories, problems, answers
pub mod question;

// A raw image matched to its ground-truth label
pub mod sample;

// Core abstractions (traits) that other layers implement
pub mod traits;
