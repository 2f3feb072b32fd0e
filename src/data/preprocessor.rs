// ============================================================
// Layer 4 — Image Preprocessor
// ============================================================
// Normalizes every collected image in place so the model sees a
// uniform canvas:
//
//   1. Convert to three-channel RGB
//   2. Shrink (never enlarge) so the longer side fits the
//      target size, aspect ratio preserved, Lanczos resampling
//   3. Center on a white square canvas of the target size
//
// The result is idempotent: a normalized image passes through
// unchanged, so re-running the stage never degrades pixels.
//
// Decoding tries an ordered list of strategies: the extension's
// decoder first, then content sniffing when the bytes disagree
// with the extension. Items that fail both are skipped, counted
// and logged; the batch always continues.

use anyhow::Result;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageError, ImageReader, Rgb, RgbImage};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::data::collector::image_files_in;
use crate::domain::errors::{SkipCounter, StageError};

const SPLITS: [&str; 2] = ["train", "val"];

/// Normalizes split images to a fixed-size white canvas.
pub struct Preprocessor {
    image_size: u32,
}

/// What one preprocessing run did.
#[derive(Debug, Default, Clone, Copy)]
pub struct PreprocessStats {
    pub processed: usize,
    pub skips:     SkipCounter,
}

impl Preprocessor {
    pub fn new(image_size: u32) -> Self {
        Self { image_size }
    }

    /// Normalize every image under `<data_dir>/{train,val}/images`,
    /// overwriting each file with its normalized form.
    pub fn run(&self, data_dir: &Path) -> Result<PreprocessStats> {
        if !data_dir.is_dir() {
            return Err(StageError::setup(format!(
                "data directory {} does not exist",
                data_dir.display()
            ))
            .into());
        }

        let mut stats = PreprocessStats::default();
        for split in SPLITS {
            let images_dir = data_dir.join(split).join("images");
            if !images_dir.is_dir() {
                tracing::warn!("{} does not exist, skipping split", images_dir.display());
                continue;
            }

            let files = image_files_in(&images_dir)?;
            tracing::info!("preprocessing {} {split} images", files.len());

            for path in &files {
                match self.normalize_file(path) {
                    Ok(()) => stats.processed += 1,
                    Err(err) => {
                        tracing::warn!("skipping {}: {err}", path.display());
                        stats.skips.record(&err);
                    }
                }
            }
        }

        tracing::info!(
            "preprocessed {} images, {}",
            stats.processed,
            stats.skips.summary()
        );
        Ok(stats)
    }

    /// Load, normalize and save one image in place.
    fn normalize_file(&self, path: &Path) -> Result<(), StageError> {
        let image      = load_image(path)?;
        let normalized = self.normalize(image);
        normalized
            .save(path)
            .map_err(|e| StageError::io(format!("saving {}: {e}", path.display())))
    }

    /// The pure normalization: RGB, shrink-only fit, centered on
    /// a white `image_size` square. Applying it to its own output
    /// returns pixel-identical data.
    pub fn normalize(&self, image: DynamicImage) -> RgbImage {
        let size   = self.image_size;
        let rgb    = image.to_rgb8();
        let (w, h) = rgb.dimensions();

        // shrink only; smaller images keep their pixels untouched
        let fitted = if w > size || h > size {
            DynamicImage::ImageRgb8(rgb)
                .resize(size, size, FilterType::Lanczos3)
                .to_rgb8()
        } else {
            rgb
        };

        let (w, h)     = fitted.dimensions();
        let mut canvas = RgbImage::from_pixel(size, size, Rgb([255, 255, 255]));
        let x          = i64::from((size - w) / 2);
        let y          = i64::from((size - h) / 2);
        imageops::overlay(&mut canvas, &fitted, x, y);
        canvas
    }
}

// ─── Decode strategies ────────────────────────────────────────────────────────

/// Strategy 1: decode via the extension's format.
/// Strategy 2: re-read with content sniffing when the extension's
/// decoder rejects the bytes. First success wins.
fn load_image(path: &Path) -> Result<DynamicImage, StageError> {
    match image::open(path) {
        Ok(img) => Ok(img),
        Err(err) if should_sniff(&err) => {
            tracing::debug!(
                "extension decode failed for {} ({err}), sniffing content",
                path.display()
            );
            decode_sniffed(path).map_err(|e| StageError::io(format!("{}: {e}", path.display())))
        }
        Err(err) => Err(StageError::io(format!("{}: {err}", path.display()))),
    }
}

fn should_sniff(err: &ImageError) -> bool {
    matches!(err, ImageError::Decoding(_) | ImageError::Unsupported(_))
}

fn decode_sniffed(path: &Path) -> Result<DynamicImage, ImageError> {
    let file   = File::open(path)?;
    let reader = ImageReader::new(BufReader::new(file)).with_guessed_format()?;
    reader.decode()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    #[test]
    fn test_small_image_is_centered_not_enlarged() {
        let p = Preprocessor::new(8);
        let input = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, BLACK));
        let out = p.normalize(input);

        assert_eq!(out.dimensions(), (8, 8));
        // 4x4 block sits at offset (2, 2)
        assert_eq!(*out.get_pixel(0, 0), WHITE);
        assert_eq!(*out.get_pixel(2, 2), BLACK);
        assert_eq!(*out.get_pixel(5, 5), BLACK);
        assert_eq!(*out.get_pixel(6, 6), WHITE);
    }

    #[test]
    fn test_large_image_shrinks_preserving_aspect() {
        let p = Preprocessor::new(8);
        let input = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 10, BLACK));
        let out = p.normalize(input);

        assert_eq!(out.dimensions(), (8, 8));
        // 20x10 fits as 8x4, vertically centered: rows 2..6 black
        assert_eq!(*out.get_pixel(4, 0), WHITE);
        assert_eq!(*out.get_pixel(4, 4), BLACK);
        assert_eq!(*out.get_pixel(4, 7), WHITE);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let p = Preprocessor::new(8);
        let input = DynamicImage::ImageRgb8(RgbImage::from_fn(20, 10, |x, y| {
            Rgb([(x * 12) as u8, (y * 25) as u8, 128])
        }));

        let once  = p.normalize(input);
        let twice = p.normalize(DynamicImage::ImageRgb8(once.clone()));
        assert_eq!(once.as_raw(), twice.as_raw());
    }

    #[test]
    fn test_run_normalizes_in_place_and_absorbs_bad_files() {
        let data       = TempDir::new().unwrap();
        let images_dir = data.path().join("train").join("images");
        std::fs::create_dir_all(&images_dir).unwrap();

        RgbImage::from_pixel(20, 10, BLACK)
            .save(images_dir.join("a.png"))
            .unwrap();
        std::fs::write(images_dir.join("b.png"), b"not an image").unwrap();

        let stats = Preprocessor::new(8).run(data.path()).unwrap();
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.skips.io, 1);

        let reopened = image::open(images_dir.join("a.png")).unwrap();
        assert_eq!(reopened.to_rgb8().dimensions(), (8, 8));
    }

    #[test]
    fn test_sniffing_rescues_mislabeled_extension() {
        let data       = TempDir::new().unwrap();
        let images_dir = data.path().join("val").join("images");
        std::fs::create_dir_all(&images_dir).unwrap();

        // PNG bytes under a .jpg name
        let png_path = images_dir.join("tmp.png");
        RgbImage::from_pixel(4, 4, BLACK).save(&png_path).unwrap();
        std::fs::rename(&png_path, images_dir.join("c.jpg")).unwrap();

        let stats = Preprocessor::new(8).run(data.path()).unwrap();
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.skips.io, 0);
    }

    #[test]
    fn test_missing_data_dir_is_setup_error() {
        let err = Preprocessor::new(8)
            .run(Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StageError>(),
            Some(StageError::Setup(_))
        ));
    }
}
