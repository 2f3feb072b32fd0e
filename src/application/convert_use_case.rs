// ============================================================
// Layer 2 — Convert Use Case
// ============================================================
// Converts both collected splits into the renumbered corpus the
// second training backend reads:
//
//   dataset/
//     images/train/   0.png, 1.png, …         (renumbered copies)
//     images/val/     0.png, 1.png, …
//     data/train_equations.txt                (line i ↔ image i)
//     data/val_equations.txt
//
// Line/image alignment is the invariant everything downstream
// relies on; the conversion fails outright rather than emit a
// misaligned corpus.

use anyhow::Result;
use std::path::PathBuf;

use crate::data::corpus::{convert_split, ConvertStats};

const SPLITS: [&str; 2] = ["train", "val"];

// ─── Configuration ───────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub data_dir:    PathBuf,
    pub dataset_dir: PathBuf,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            data_dir:    PathBuf::from("data"),
            dataset_dir: PathBuf::from("dataset"),
        }
    }
}

// ─── ConvertUseCase ──────────────────────────────────────────────────────────
pub struct ConvertUseCase {
    config: ConvertConfig,
}

impl ConvertUseCase {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        for split in SPLITS {
            let stats = self.convert_one(split)?;
            println!(
                "{}: {} images converted, {} dropped (missing image), {} malformed rows",
                split, stats.converted, stats.dropped_missing, stats.skips.parse,
            );
        }
        Ok(())
    }

    fn convert_one(&self, split: &str) -> Result<ConvertStats> {
        let cfg = &self.config;
        convert_split(
            &cfg.data_dir.join(split).join("labels.txt"),
            &cfg.data_dir.join(split).join("images"),
            &cfg.dataset_dir.join("images").join(split),
            &cfg.dataset_dir.join("data").join(format!("{split}_equations.txt")),
        )
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::collect_use_case::{CollectConfig, CollectUseCase};
    use crate::application::generate_bank_use_case::{GenerateBankConfig, GenerateBankUseCase};
    use crate::application::preprocess_use_case::{PreprocessConfig, PreprocessUseCase};
    use crate::domain::category::Category;
    use image::RgbImage;
    use std::fs;
    use tempfile::TempDir;

    // bank → collect → preprocess → convert, through the use cases
    #[test]
    fn test_pipeline_end_to_end() {
        let tmp         = TempDir::new().unwrap();
        let bank_path   = tmp.path().join("question_bank.json");
        let data_dir    = tmp.path().join("data");
        let dataset_dir = tmp.path().join("dataset");
        let raw_dir     = data_dir.join("raw");

        // pool over [3,4] cycles (3,3),(3,4),… so id 2 answers 3+4=7
        GenerateBankUseCase::new(GenerateBankConfig {
            bank_path: bank_path.clone(),
            category:  Category::Addition,
            count:     4,
            low:       3,
            high:      4,
            ..Default::default()
        })
        .execute()
        .unwrap();

        fs::create_dir_all(&raw_dir).unwrap();
        RgbImage::from_pixel(10, 6, image::Rgb([20, 20, 20]))
            .save(raw_dir.join("addition_2_20240101.png"))
            .unwrap();
        // one malformed name and one unknown id, both skipped
        RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 0]))
            .save(raw_dir.join("junk.png"))
            .unwrap();
        RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 0]))
            .save(raw_dir.join("addition_99_20240101.png"))
            .unwrap();

        CollectUseCase::new(CollectConfig {
            bank_path,
            raw_dir,
            data_dir: data_dir.clone(),
            ..Default::default()
        })
        .execute()
        .unwrap();

        // one usable sample: floor(0.8 × 1) = 0 train, 1 val
        let val_labels = fs::read_to_string(data_dir.join("val/labels.txt")).unwrap();
        assert_eq!(val_labels, "addition_2_20240101.png\t7");
        let train_labels = fs::read_to_string(data_dir.join("train/labels.txt")).unwrap();
        assert_eq!(train_labels, "");

        PreprocessUseCase::new(PreprocessConfig {
            config_path: tmp.path().join("config.json"),
            data_dir:    data_dir.clone(),
            image_size:  Some(8),
        })
        .execute()
        .unwrap();

        let normalized = image::open(data_dir.join("val/images/addition_2_20240101.png")).unwrap();
        assert_eq!((normalized.width(), normalized.height()), (8, 8));

        ConvertUseCase::new(ConvertConfig {
            data_dir:    data_dir.clone(),
            dataset_dir: dataset_dir.clone(),
        })
        .execute()
        .unwrap();

        // corpus line 0 labels image 0
        assert!(dataset_dir.join("images/val/0.png").is_file());
        let equations = fs::read_to_string(dataset_dir.join("data/val_equations.txt")).unwrap();
        assert_eq!(equations, "7");
        let train_eq = fs::read_to_string(dataset_dir.join("data/train_equations.txt")).unwrap();
        assert_eq!(train_eq, "");
    }
}
