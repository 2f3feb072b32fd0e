// ============================================================
// Layer 5 — Error Rate Metrics
// ============================================================
// Two normalizations, kept deliberately separate:
//
//   sample_cer   edit distance / this reference's length.
//                Used only to RANK individual predictions.
//
//   corpus_cer   summed edit distances / summed reference
//   corpus_wer   lengths over the whole set. Used for the
//                pass/fail threshold. A long correct answer
//                buys slack for a short wrong one, which a
//                mean of per-sample rates would not allow.
//
// CER counts character edits, WER counts whitespace-delimited
// word edits. The corpus functions require parallel lists; a
// length mismatch means an upstream alignment bug and is
// reported as a metric computation error rather than absorbed.

use strsim::{generic_levenshtein, levenshtein};

use crate::domain::errors::StageError;

/// Per-sample character error rate, for ranking worst offenders.
/// An empty reference normalizes by 1 so the rate stays finite.
pub fn sample_cer(reference: &str, hypothesis: &str) -> f64 {
    let distance = levenshtein(reference, hypothesis);
    let chars    = reference.chars().count();
    distance as f64 / chars.max(1) as f64
}

/// Aggregate character error rate over parallel lists.
pub fn corpus_cer(references: &[&str], hypotheses: &[&str]) -> Result<f64, StageError> {
    check_alignment(references, hypotheses)?;

    let mut distance = 0usize;
    let mut total    = 0usize;
    for (reference, hypothesis) in references.iter().zip(hypotheses) {
        distance += levenshtein(reference, hypothesis);
        total    += reference.chars().count();
    }
    Ok(distance as f64 / total.max(1) as f64)
}

/// Aggregate word error rate over parallel lists.
pub fn corpus_wer(references: &[&str], hypotheses: &[&str]) -> Result<f64, StageError> {
    check_alignment(references, hypotheses)?;

    let mut distance = 0usize;
    let mut total    = 0usize;
    for (reference, hypothesis) in references.iter().zip(hypotheses) {
        let ref_words: Vec<&str> = reference.split_whitespace().collect();
        let hyp_words: Vec<&str> = hypothesis.split_whitespace().collect();
        distance += generic_levenshtein(&ref_words, &hyp_words);
        total    += ref_words.len();
    }
    Ok(distance as f64 / total.max(1) as f64)
}

fn check_alignment(references: &[&str], hypotheses: &[&str]) -> Result<(), StageError> {
    if references.len() != hypotheses.len() {
        return Err(StageError::metric(format!(
            "{} references vs {} hypotheses",
            references.len(),
            hypotheses.len()
        )));
    }
    if references.is_empty() {
        return Err(StageError::metric("no samples to score"));
    }
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_cer_single_substitution() {
        // one edit over a two-character reference
        assert_eq!(sample_cer("12", "13"), 0.5);
    }

    #[test]
    fn test_sample_cer_bounds() {
        assert_eq!(sample_cer("7", "7"), 0.0);
        assert_eq!(sample_cer("7", ""), 1.0);
        // empty reference normalizes by 1
        assert_eq!(sample_cer("", "ab"), 2.0);
    }

    #[test]
    fn test_sample_cer_counts_chars_not_bytes() {
        let cer = sample_cer("\\frac{1}{2}", "\\frac{1}{3}");
        assert_eq!(cer, 1.0 / 11.0);
    }

    #[test]
    fn test_corpus_cer_is_not_the_mean_of_sample_rates() {
        let refs = ["aaaa", "b"];
        let hyps = ["aaab", "c"];
        // summed: (1 + 1) / (4 + 1) = 0.4
        // mean of per-sample rates would be (0.25 + 1.0) / 2 = 0.625
        assert_eq!(corpus_cer(&refs, &hyps).unwrap(), 0.4);
    }

    #[test]
    fn test_corpus_wer_counts_words() {
        let refs = ["x y", "z"];
        let hyps = ["x y", "q"];
        assert_eq!(corpus_wer(&refs, &hyps).unwrap(), 1.0 / 3.0);

        let refs = ["the cat sat"];
        let hyps = ["the cat sat"];
        assert_eq!(corpus_wer(&refs, &hyps).unwrap(), 0.0);
    }

    #[test]
    fn test_misalignment_is_a_metric_error() {
        let refs = ["a", "b"];
        let hyps = ["a"];
        assert!(matches!(
            corpus_cer(&refs, &hyps),
            Err(StageError::MetricComputation(_))
        ));
        assert!(matches!(
            corpus_wer(&refs, &hyps),
            Err(StageError::MetricComputation(_))
        ));
    }

    #[test]
    fn test_empty_lists_are_a_metric_error() {
        assert!(matches!(
            corpus_cer(&[], &[]),
            Err(StageError::MetricComputation(_))
        ));
    }
}
