// ============================================================
// Layer 4 — Question Bank Store & Generator
// ============================================================
// Loads and saves bank JSON, and generates the arithmetic
// categories locally. Operand pairs are drawn from the square
// [low, high] x [low, high]:
//
//   - default: deterministic cycling through the pool in
//     row-major order, so the same parameters always produce
//     the same bank
//   - randomize: sampling without replacement while the pool
//     lasts, with replacement once `count` exceeds it; a seed
//     makes the draw reproducible
//
// Ids are assigned 1-based in generation order. Integral banks
// cannot be generated here, they are authored externally and
// only ever loaded.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::Path;

use crate::domain::category::Category;
use crate::domain::errors::StageError;
use crate::domain::question::{Answer, Problem, QuestionBank};

/// Load a bank from JSON. Unknown category keys fail the load:
/// categories are a closed set.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading question bank {}", path.display()))?;
    let bank: QuestionBank = serde_json::from_str(&text)
        .with_context(|| format!("parsing question bank {}", path.display()))?;
    Ok(bank)
}

/// Save a bank as pretty JSON, creating parent directories.
pub fn save_bank(bank: &QuestionBank, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(bank).context("serializing question bank")?;
    fs::write(path, json)
        .with_context(|| format!("writing question bank {}", path.display()))?;
    Ok(())
}

// ─── Generation ───────────────────────────────────────────────────────────────

/// Parameters for generating one arithmetic category.
#[derive(Debug, Clone)]
pub struct BankSpec {
    pub category:  Category,
    pub count:     usize,
    pub low:       i64,
    pub high:      i64,
    pub randomize: bool,
    pub seed:      Option<u64>,
}

/// Generate `spec.count` problems for an arithmetic category.
pub fn generate_problems(spec: &BankSpec) -> Result<Vec<Problem>, StageError> {
    if spec.count == 0 {
        return Err(StageError::validation("count must be positive"));
    }
    if spec.low > spec.high {
        return Err(StageError::validation(format!(
            "low ({}) must be <= high ({})",
            spec.low, spec.high
        )));
    }
    let rule = spec.category.arithmetic_rule().ok_or_else(|| {
        StageError::validation(format!(
            "category `{}` cannot be generated locally",
            spec.category
        ))
    })?;

    // the full operand square, row-major; never empty once low <= high
    let pool: Vec<(i64, i64)> = (spec.low..=spec.high)
        .flat_map(|a| (spec.low..=spec.high).map(move |b| (a, b)))
        .collect();

    let chosen: Vec<(i64, i64)> = if spec.randomize {
        let mut rng = match spec.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        if spec.count <= pool.len() {
            pool.choose_multiple(&mut rng, spec.count).copied().collect()
        } else {
            (0..spec.count)
                .map(|_| pool[rng.gen_range(0..pool.len())])
                .collect()
        }
    } else {
        (0..spec.count).map(|i| pool[i % pool.len()]).collect()
    };

    Ok(chosen
        .into_iter()
        .enumerate()
        .map(|(i, (a, b))| Problem {
            id:      (i + 1) as u32,
            problem: rule.problem_latex(a, b),
            answer:  Answer::Number(serde_json::Number::from(rule.answer(a, b))),
        })
        .collect())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn spec(category: Category, count: usize) -> BankSpec {
        BankSpec {
            category,
            count,
            low: 1,
            high: 2,
            randomize: false,
            seed: None,
        }
    }

    #[test]
    fn test_cycling_is_deterministic_and_row_major() {
        // pool over [1,2]^2 is (1,1) (1,2) (2,1) (2,2), then wraps
        let problems = generate_problems(&spec(Category::Addition, 5)).unwrap();
        let rendered: Vec<&str> = problems.iter().map(|p| p.problem.as_str()).collect();
        assert_eq!(
            rendered,
            vec!["$1 + 1$", "$1 + 2$", "$2 + 1$", "$2 + 2$", "$1 + 1$"]
        );
        assert_eq!(problems[1].answer.as_label(), "3");
    }

    #[test]
    fn test_ids_are_one_based_in_order() {
        let problems = generate_problems(&spec(Category::Multiplication, 3)).unwrap();
        let ids: Vec<u32> = problems.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(problems[2].problem, "$2 \\times 1$");
        assert_eq!(problems[2].answer.as_label(), "2");
    }

    #[test]
    fn test_validation_rules() {
        assert!(matches!(
            generate_problems(&spec(Category::Addition, 0)),
            Err(StageError::Validation(_))
        ));

        let mut bad_range = spec(Category::Addition, 3);
        bad_range.low  = 5;
        bad_range.high = 2;
        assert!(matches!(
            generate_problems(&bad_range),
            Err(StageError::Validation(_))
        ));

        assert!(matches!(
            generate_problems(&spec(Category::Integrals, 3)),
            Err(StageError::Validation(_))
        ));
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let mut a = spec(Category::Addition, 3);
        a.randomize = true;
        a.seed      = Some(42);
        let first  = generate_problems(&a).unwrap();
        let second = generate_problems(&a).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_sampling_without_replacement_within_pool() {
        let spec = BankSpec {
            category:  Category::Addition,
            count:     4,
            low:       1,
            high:      2,
            randomize: true,
            seed:      Some(7),
        };
        let problems = generate_problems(&spec).unwrap();
        let unique: BTreeSet<&str> = problems.iter().map(|p| p.problem.as_str()).collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_oversized_count_wraps_with_replacement() {
        let mut oversized = spec(Category::Addition, 10);
        oversized.randomize = true;
        oversized.seed      = Some(1);
        let problems = generate_problems(&oversized).unwrap();
        assert_eq!(problems.len(), 10);
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir  = TempDir::new().unwrap();
        let path = dir.path().join("bank").join("questions.json");

        let mut bank = QuestionBank::new();
        bank.set_category(
            Category::Addition,
            generate_problems(&spec(Category::Addition, 4)).unwrap(),
        );
        save_bank(&bank, &path).unwrap();

        let loaded = load_bank(&path).unwrap();
        assert_eq!(loaded.total_problems(), 4);
        assert_eq!(loaded.lookup(Category::Addition, 2).unwrap().answer.as_label(), "3");
    }
}
