// ============================================================
// Layer 4 — Data Collector
// ============================================================
// Turns a directory of raw worksheet photos into the two split
// directories every later stage consumes:
//
//   <data_dir>/train/images/*.png      copied source images
//   <data_dir>/train/labels.txt        image<TAB>label rows
//   <data_dir>/val/images/*.png
//   <data_dir>/val/labels.txt
//
// Labels come from the question bank, resolved through each
// filename stem (category_id_timestamp). Items that cannot be
// parsed or resolved are skipped, warned about and counted;
// only a missing raw directory aborts the stage.
//
// The split is reproducible: usable samples are sorted by
// filename before the seeded shuffle, so the same raw directory
// and seed always land every sample in the same split.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::labels::{write_label_file, LabelRow};
use crate::data::splitter::split_train_val;
use crate::domain::errors::{SkipCounter, StageError};
use crate::domain::question::QuestionBank;
use crate::domain::sample::ImageSample;

/// Collects raw images into labeled train/val splits.
pub struct Collector<'a> {
    bank:           &'a QuestionBank,
    seed:           u64,
    train_fraction: f64,
}

/// What one collection run did.
#[derive(Debug, Default, Clone, Copy)]
pub struct CollectStats {
    /// Image files seen in the raw directory.
    pub scanned: usize,
    /// Samples that parsed and resolved to a bank answer.
    pub usable:  usize,
    /// Label rows written to the train split.
    pub train:   usize,
    /// Label rows written to the val split.
    pub val:     usize,
    pub skips:   SkipCounter,
}

impl<'a> Collector<'a> {
    pub fn new(bank: &'a QuestionBank, seed: u64, train_fraction: f64) -> Self {
        Self {
            bank,
            seed,
            train_fraction,
        }
    }

    /// Scan `raw_dir`, resolve labels and materialize both splits
    /// under `data_dir`.
    pub fn collect(&self, raw_dir: &Path, data_dir: &Path) -> Result<CollectStats> {
        // ── Step 1: Scan the raw directory ────────────────────────────────────
        if !raw_dir.is_dir() {
            return Err(StageError::setup(format!(
                "raw image directory {} does not exist",
                raw_dir.display()
            ))
            .into());
        }
        let paths = image_files_in(raw_dir)?;
        tracing::info!("found {} images in {}", paths.len(), raw_dir.display());

        // ── Step 2: Resolve labels against the question bank ──────────────────
        let mut skips   = SkipCounter::new();
        let mut samples = Vec::with_capacity(paths.len());
        for path in &paths {
            match ImageSample::resolve(path, self.bank) {
                Ok(sample) => samples.push(sample),
                Err(err) => {
                    tracing::warn!("skipping {}: {err}", path.display());
                    skips.record(&err);
                }
            }
        }
        let usable = samples.len();
        if usable == 0 {
            tracing::warn!("no usable samples in {}, splits will be empty", raw_dir.display());
        }

        // ── Step 3: Seeded shuffle and split ──────────────────────────────────
        // Sort first: read_dir order is OS-dependent, the shuffle
        // must start from the same sequence on every run.
        samples.sort_by(|a, b| a.file_name().cmp(b.file_name()));
        let (train, val) = split_train_val(samples, self.train_fraction, self.seed);

        // ── Step 4: Copy images and write label files ─────────────────────────
        let train_written = self.write_split(&train, &data_dir.join("train"), &mut skips)?;
        let val_written   = self.write_split(&val, &data_dir.join("val"), &mut skips)?;

        let stats = CollectStats {
            scanned: paths.len(),
            usable,
            train: train_written,
            val: val_written,
            skips,
        };
        tracing::info!(
            "collected {} samples into {} train / {} val, {}",
            stats.usable,
            stats.train,
            stats.val,
            stats.skips.summary(),
        );
        Ok(stats)
    }

    /// Copy one split's images and write its label file.
    /// A failed copy skips that sample (counted as io) so the
    /// label file stays 1:1 with the images actually present.
    fn write_split(
        &self,
        samples: &[ImageSample],
        split_dir: &Path,
        skips: &mut SkipCounter,
    ) -> Result<usize> {
        let images_dir = split_dir.join("images");
        fs::create_dir_all(&images_dir)
            .with_context(|| format!("creating {}", images_dir.display()))?;

        let mut rows = Vec::with_capacity(samples.len());
        for sample in samples {
            let dst = images_dir.join(sample.file_name());
            match fs::copy(&sample.file, &dst) {
                Ok(_) => rows.push(LabelRow {
                    image: sample.file_name().to_string(),
                    label: sample.label.clone(),
                }),
                Err(e) => {
                    let err =
                        StageError::io(format!("copying {}: {e}", sample.file.display()));
                    tracing::warn!("{err}");
                    skips.record(&err);
                }
            }
        }

        write_label_file(&split_dir.join("labels.txt"), &rows)?;
        tracing::debug!("wrote {} rows under {}", rows.len(), split_dir.display());
        Ok(rows.len())
    }
}

/// List image files (png/jpg/jpeg, any case) in `dir`, sorted by
/// path so every run sees the same order.
pub(crate) fn image_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("cannot read directory {}", dir.display()))?
    {
        let entry = entry?;
        let path  = entry.path();
        if !path.is_file() {
            continue;
        }
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
        {
            Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg") => paths.push(path),
            _ => tracing::debug!("ignoring non-image entry {}", path.display()),
        }
    }
    paths.sort();
    Ok(paths)
}
