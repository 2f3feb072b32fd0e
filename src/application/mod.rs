// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// One use case per pipeline stage. Each orchestrates the lower
// layers for a single workflow and owns nothing else:
//
//   generate_bank_use_case — write arithmetic problems into the bank
//   collect_use_case       — raw images → labeled train/val splits
//   preprocess_use_case    — normalize split images in place
//   convert_use_case       — splits → renumbered corpus + equations
//   build_vocab_use_case   — corpus → persisted BPE vocabulary
//   train_use_case         — hand the splits to the model backend
//   evaluate_use_case      — score the trained model on val
//   infer_use_case         — one image → predicted LaTeX
//
// Rules for this layer:
//   - No pipeline algorithms here (that's Layer 4 and 5)
//   - No argument parsing here (that's Layer 1)
//   - Diagnostics via tracing; user-facing results via println
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

pub mod generate_bank_use_case;

pub mod collect_use_case;

pub mod preprocess_use_case;

pub mod convert_use_case;

pub mod build_vocab_use_case;

pub mod train_use_case;

pub mod evaluate_use_case;

pub mod infer_use_case;
