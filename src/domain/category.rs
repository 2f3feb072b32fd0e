// ============================================================
// Layer 3 — Category Domain Type
// ============================================================
// Worksheet categories are a closed set. Each category carries
// its rendering and answer rules as data, so no other layer
// branches on a category name string.
//
// Arithmetic categories (addition, multiplication) can be
// generated locally from an operand range. Integral banks are
// authored externally and are only ever consumed here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::StageError;

/// A worksheet category.
///
/// Serialized in lowercase so the variants double as the question
/// bank's JSON keys and as the first token of image filename stems.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Addition,
    Multiplication,
    Integrals,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Addition,
        Category::Multiplication,
        Category::Integrals,
    ];

    /// The key used in bank JSON and filename stems.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Addition       => "addition",
            Category::Multiplication => "multiplication",
            Category::Integrals      => "integrals",
        }
    }

    /// The generation rule, for categories that can be generated
    /// locally. `Integrals` has none: those banks are authored
    /// outside the pipeline.
    pub fn arithmetic_rule(&self) -> Option<ArithmeticRule> {
        match self {
            Category::Addition => Some(ArithmeticRule {
                operator: "+",
                apply:    |a, b| a + b,
            }),
            Category::Multiplication => Some(ArithmeticRule {
                operator: "\\times",
                apply:    |a, b| a * b,
            }),
            Category::Integrals => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addition"       => Ok(Category::Addition),
            "multiplication" => Ok(Category::Multiplication),
            "integrals"      => Ok(Category::Integrals),
            other => Err(StageError::parse(format!("unknown category `{other}`"))),
        }
    }
}

// ─── ArithmeticRule ───────────────────────────────────────────────────────────

/// How an arithmetic category renders a problem and computes its answer.
#[derive(Clone, Copy)]
pub struct ArithmeticRule {
    /// LaTeX operator placed between the operands.
    pub operator: &'static str,
    apply:        fn(i64, i64) -> i64,
}

impl ArithmeticRule {
    /// Inline-math rendering of one operand pair, e.g. `$3 + 4$`.
    pub fn problem_latex(&self, a: i64, b: i64) -> String {
        format!("${} {} {}$", a, self.operator, b)
    }

    pub fn answer(&self, a: i64, b: i64) -> i64 {
        (self.apply)(a, b)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
