// ============================================================
// Layer 3 — Image Sample Domain Type
// ============================================================
// A raw worksheet photo is matched to its ground truth purely by
// filename: the stem encodes which bank question was answered.
//
//   addition_1_20241101_120000.png
//   └──┬───┘ │ └────┬──────────┘
//   category id  timestamp (kept verbatim, may itself
//                contain underscores, may be absent)
//
// The label always comes from the question bank lookup, never
// from the image content.

use std::path::{Path, PathBuf};

use crate::domain::category::Category;
use crate::domain::errors::StageError;
use crate::domain::question::QuestionBank;

/// Parsed form of a raw image filename stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleName {
    pub category:    Category,
    pub question_id: u32,
    pub timestamp:   String,
}

impl SampleName {
    /// Parse a `category_id[_timestamp]` stem.
    pub fn parse(stem: &str) -> Result<Self, StageError> {
        let mut parts = stem.splitn(3, '_');
        let (category, id) = match (parts.next(), parts.next()) {
            (Some(c), Some(i)) if !c.is_empty() && !i.is_empty() => (c, i),
            _ => {
                return Err(StageError::parse(format!(
                    "stem `{stem}` is not category_id[_timestamp]"
                )))
            }
        };
        let timestamp = parts.next().unwrap_or("").to_string();

        let category = category.parse::<Category>()?;
        let question_id = id.parse::<u32>().map_err(|_| {
            StageError::parse(format!("question id `{id}` in `{stem}` is not numeric"))
        })?;

        Ok(Self {
            category,
            question_id,
            timestamp,
        })
    }
}

/// A raw image matched to its ground-truth label.
#[derive(Debug, Clone)]
pub struct ImageSample {
    /// Path of the source image in the raw directory.
    pub file:        PathBuf,
    pub category:    Category,
    pub question_id: u32,
    pub timestamp:   String,
    /// Ground truth resolved from the question bank.
    pub label:       String,
}

impl ImageSample {
    /// Parse a raw image path and resolve its label against the bank.
    ///
    /// Fails with `Parse` for a malformed name, `Validation` when the
    /// bank has no matching entry or the answer cannot be represented
    /// in a tab-delimited label file.
    pub fn resolve(path: &Path, bank: &QuestionBank) -> Result<Self, StageError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                StageError::parse(format!("non-UTF8 filename `{}`", path.display()))
            })?;
        let name = SampleName::parse(stem)?;

        let problem = bank.lookup(name.category, name.question_id).ok_or_else(|| {
            StageError::validation(format!(
                "no bank entry for ({}, {})",
                name.category, name.question_id
            ))
        })?;

        let label = problem.answer.as_label();
        if label.contains('\t') {
            return Err(StageError::validation(format!(
                "answer for ({}, {}) contains a tab",
                name.category, name.question_id
            )));
        }

        Ok(Self {
            file:        path.to_path_buf(),
            category:    name.category,
            question_id: name.question_id,
            timestamp:   name.timestamp,
            label,
        })
    }

    /// The bare filename, used for label rows and sort order.
    pub fn file_name(&self) -> &str {
        self.file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::question::{Answer, Problem};

    fn bank_with_addition_1() -> QuestionBank {
        let mut bank = QuestionBank::new();
        bank.set_category(
            Category::Addition,
            vec![Problem {
                id:      1,
                problem: "$3 + 4$".to_string(),
                answer:  Answer::Number(serde_json::Number::from(7)),
            }],
        );
        bank
    }

    #[test]
    fn test_parse_full_stem() {
        let name = SampleName::parse("addition_1_20241101_120000").unwrap();
        assert_eq!(name.category, Category::Addition);
        assert_eq!(name.question_id, 1);
        assert_eq!(name.timestamp, "20241101_120000");
    }

    #[test]
    fn test_parse_stem_without_timestamp() {
        let name = SampleName::parse("multiplication_7").unwrap();
        assert_eq!(name.category, Category::Multiplication);
        assert_eq!(name.question_id, 7);
        assert_eq!(name.timestamp, "");
    }

    #[test]
    fn test_parse_rejects_malformed_stems() {
        assert!(matches!(
            SampleName::parse("notes"),
            Err(StageError::Parse(_))
        ));
        assert!(matches!(
            SampleName::parse("subtraction_1_x"),
            Err(StageError::Parse(_))
        ));
        assert!(matches!(
            SampleName::parse("addition_one_x"),
            Err(StageError::Parse(_))
        ));
        assert!(matches!(SampleName::parse(""), Err(StageError::Parse(_))));
    }

    #[test]
    fn test_resolve_matches_bank_answer() {
        let bank = bank_with_addition_1();
        let sample =
            ImageSample::resolve(Path::new("/raw/addition_1_20240101.png"), &bank).unwrap();
        assert_eq!(sample.label, "7");
        assert_eq!(sample.file_name(), "addition_1_20240101.png");
        assert_eq!(sample.timestamp, "20240101");
    }

    #[test]
    fn test_resolve_without_bank_entry_is_validation_error() {
        let bank = bank_with_addition_1();
        let err =
            ImageSample::resolve(Path::new("/raw/addition_9_20240101.png"), &bank).unwrap_err();
        assert!(matches!(err, StageError::Validation(_)));

        let err =
            ImageSample::resolve(Path::new("/raw/integrals_1_20240101.png"), &bank).unwrap_err();
        assert!(matches!(err, StageError::Validation(_)));
    }

    #[test]
    fn test_resolve_rejects_tab_in_answer() {
        let mut bank = QuestionBank::new();
        bank.set_category(
            Category::Addition,
            vec![Problem {
                id:      1,
                problem: "$3 + 4$".to_string(),
                answer:  Answer::Text("7\tseven".to_string()),
            }],
        );
        let err = ImageSample::resolve(Path::new("addition_1_t.png"), &bank).unwrap_err();
        assert!(matches!(err, StageError::Validation(_)));
    }
}
