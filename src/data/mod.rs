// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from raw worksheet photos
// all the way to the renumbered corpus the second training
// backend consumes.
//
// The pipeline flows in this order:
//
//   raw images (category_id_timestamp.png)
//       │
//       ▼
//   collector     → parses names, resolves labels from the
//       │           question bank, copies into train/val splits
//       ▼
//   preprocessor  → normalizes every split image in place
//       │           (RGB, shrink-only, centered white canvas)
//       ▼
//   corpus        → brace-cleaned labels + 0-indexed renumbered
//                   images + aligned equations files
//
// bank, labels and splitter are the shared building blocks:
// bank loads/generates question banks, labels is the
// tab-delimited label file codec, splitter is the seeded
// train/validation partition.
//
// Each module is responsible for exactly one step.

/// Loads, saves and generates question banks
pub mod bank;

/// Scans raw images, resolves labels, writes the two splits
pub mod collector;

/// Converts label files into the renumbered equations corpus
pub mod corpus;

/// Reads and writes tab-delimited label files
pub mod labels;

/// Normalizes split images to a fixed-size white canvas
pub mod preprocessor;

/// Shuffles and splits samples into train/validation sets
pub mod splitter;
