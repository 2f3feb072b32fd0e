// ============================================================
// Layer 3 — Question Bank Domain Types
// ============================================================
// The question bank is the canonical source of correct answers:
// a map from category to an ordered list of problems. It is a
// pipeline INPUT and is never modified during collection.
//
// Example bank JSON:
//   {
//     "addition": [
//       { "id": 1, "problem": "$3 + 4$", "answer": 7 }
//     ],
//     "integrals": [
//       { "id": 1, "problem": "$\\int x \\, dx$", "answer": "\\frac{x^2}{2} + C" }
//     ]
//   }
//
// Ids are unique within a category only; (category, id) is the
// lookup key for label resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::category::Category;

/// An answer as authored in the bank.
///
/// Numbers keep their source formatting (`7` labels as `"7"`,
/// `2.50` as `"2.50"`), so the bank author controls the exact
/// training text either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Number(serde_json::Number),
}

impl Answer {
    /// The label text written into label files.
    pub fn as_label(&self) -> String {
        match self {
            Answer::Text(s)   => s.clone(),
            Answer::Number(n) => n.to_string(),
        }
    }
}

/// One problem in the bank. The `problem` field is display text
/// (LaTeX for the generated arithmetic banks); only `answer`
/// feeds the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id:      u32,
    pub problem: String,
    pub answer:  Answer,
}

/// The full bank, keyed by category. BTreeMap keeps iteration
/// order stable for summaries and serialized output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank(pub BTreeMap<Category, Vec<Problem>>);

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a problem by its (category, id) key.
    pub fn lookup(&self, category: Category, question_id: u32) -> Option<&Problem> {
        self.0
            .get(&category)?
            .iter()
            .find(|p| p.id == question_id)
    }

    /// Replace the problem list for one category.
    pub fn set_category(&mut self, category: Category, problems: Vec<Problem>) {
        self.0.insert(category, problems);
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.0.contains_key(&category)
    }

    pub fn total_problems(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &Vec<Problem>)> {
        self.0.iter()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
