// ============================================================
// Layer 4 — Corpus Converter
// ============================================================
// Converts one split's label file into the renumbered corpus
// the second training backend expects:
//
//   <out_images_dir>/0.png, 1.png, ...   images renumbered from 0
//   <equations_file>                     line i = label of image i
//
// Index alignment is the contract here: the equations file and
// the image directory are parallel arrays, so every drop must
// happen before numbering starts. Rows are sorted by their
// original filename first, which keeps the numbering stable
// across runs.
//
// Labels pass through a single brace-cleaning step: exactly one
// outer {{ }} layer is removed, and only when the remaining
// string still has balanced braces. `{{x^2}}` becomes `{x^2}`
// while `{x^2}` and the unbalanced `{{x^2}` stay untouched.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::data::labels::read_label_file;
use crate::domain::errors::{SkipCounter, StageError};

/// Extensions the backend accepts verbatim; anything else is
/// renamed to .png during the copy.
const KEPT_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// What one split conversion did.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConvertStats {
    /// Images copied = equations lines written.
    pub converted:       usize,
    /// Label rows dropped because their image was missing.
    pub dropped_missing: usize,
    pub skips:           SkipCounter,
}

/// Convert one split: read `labels_file`, copy its images from
/// `images_dir` into `out_images_dir` under 0-based names, and
/// write the aligned `equations_file`.
pub fn convert_split(
    labels_file: &Path,
    images_dir: &Path,
    out_images_dir: &Path,
    equations_file: &Path,
) -> Result<ConvertStats> {
    // ── Step 1: Read the label rows ───────────────────────────────────────────
    if !labels_file.is_file() {
        return Err(StageError::setup(format!(
            "label file {} does not exist",
            labels_file.display()
        ))
        .into());
    }
    let parsed = read_label_file(labels_file)?;

    // ── Step 2: Keep rows whose image exists, clean their labels ──────────────
    let mut dropped_missing = 0usize;
    let mut pairs: Vec<(String, String)> = Vec::with_capacity(parsed.rows.len());
    for row in &parsed.rows {
        let src = images_dir.join(&row.image);
        if !src.is_file() {
            tracing::debug!("dropping {}: image not found", row.image);
            dropped_missing += 1;
            continue;
        }
        pairs.push((row.image.clone(), clean_label(&row.label).to_string()));
    }

    // ── Step 3: Sort by original filename, then renumber from 0 ──────────────
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    fs::create_dir_all(out_images_dir)
        .with_context(|| format!("creating {}", out_images_dir.display()))?;
    if let Some(parent) = equations_file.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }

    let mut equations = Vec::with_capacity(pairs.len());
    for (idx, (image, label)) in pairs.iter().enumerate() {
        let ext = numbered_extension(image);
        let src = images_dir.join(image);
        let dst = out_images_dir.join(format!("{idx}{ext}"));
        fs::copy(&src, &dst)
            .with_context(|| format!("copying {} to {}", src.display(), dst.display()))?;
        equations.push(label.as_str());
    }

    // ── Step 4: Write the aligned equations file ──────────────────────────────
    fs::write(equations_file, equations.join("\n"))
        .with_context(|| format!("writing {}", equations_file.display()))?;

    let stats = ConvertStats {
        converted: pairs.len(),
        dropped_missing,
        skips: SkipCounter {
            parse:      parsed.malformed,
            validation: 0,
            io:         0,
        },
    };
    tracing::info!(
        "converted {} rows into {} ({} dropped, {})",
        stats.converted,
        equations_file.display(),
        stats.dropped_missing,
        stats.skips.summary(),
    );
    Ok(stats)
}

/// Extension for a renumbered copy, dot included.
fn numbered_extension(image: &str) -> String {
    let ext = Path::new(image)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext {
        Some(e) if KEPT_EXTENSIONS.contains(&e.as_str()) => format!(".{e}"),
        _ => ".png".to_string(),
    }
}

// ─── Brace cleaning ───────────────────────────────────────────────────────────

/// Strip exactly one outer `{{ }}` layer when the result keeps
/// balanced braces; otherwise return the label unchanged.
pub fn clean_label(label: &str) -> &str {
    if label.starts_with("{{") && label.ends_with("}}") {
        // both guards matched ASCII braces, so the slice below
        // stays on char boundaries
        let inner = &label[1..label.len() - 1];
        if has_balanced_braces(inner) {
            return inner;
        }
    }
    label
}

/// Balanced means the depth never goes negative and ends at zero.
fn has_balanced_braces(s: &str) -> bool {
    let mut depth: i32 = 0;
    for c in s.chars() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}
