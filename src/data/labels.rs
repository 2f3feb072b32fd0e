// ============================================================
// Layer 4 — Label File Codec
// ============================================================
// A label file pairs every image in a split with its ground
// truth, one record per line:
//
//   addition_1_20240101.png<TAB>7
//   integrals_3_20240102.png<TAB>\frac{x^2}{2} + C
//
// The tab is the only delimiter, which is why the collector
// refuses answers containing one. Blank lines are ignored; a
// non-blank line without a tab is malformed and counted so the
// caller can report it.
//
// Files are written without a trailing newline so a rewritten
// file is byte-stable across runs.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::domain::errors::StageError;

/// One `image<TAB>label` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRow {
    pub image: String,
    pub label: String,
}

/// A parsed label file plus its malformed-row tally.
#[derive(Debug, Default)]
pub struct LabelFile {
    pub rows:      Vec<LabelRow>,
    pub malformed: usize,
}

/// Write `rows` to `path`, one tab-delimited record per line.
pub fn write_label_file(path: &Path, rows: &[LabelRow]) -> Result<()> {
    let body = rows
        .iter()
        .map(|r| format!("{}\t{}", r.image, r.label))
        .collect::<Vec<_>>()
        .join("\n");

    fs::write(path, body)
        .with_context(|| format!("writing label file {}", path.display()))?;
    Ok(())
}

/// Read a label file.
///
/// Returns an error only when the file itself cannot be read;
/// malformed rows are skipped, warned about and counted in the
/// returned [`LabelFile`].
pub fn read_label_file(path: &Path) -> Result<LabelFile> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading label file {}", path.display()))?;

    let mut parsed = LabelFile::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once('\t') {
            Some((image, label)) => parsed.rows.push(LabelRow {
                image: image.to_string(),
                label: label.to_string(),
            }),
            None => {
                let err = StageError::parse(format!(
                    "label row without a tab in {}: `{line}`",
                    path.display()
                ));
                tracing::warn!("{err}");
                parsed.malformed += 1;
            }
        }
    }
    Ok(parsed)
}
