// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Shuffles samples with a caller-supplied seed and splits them
// into two disjoint sets:
//   - Training set:   used to update model weights
//   - Validation set: used to measure performance on unseen data
//
// Reproducibility contract: identical input order, fraction and
// seed always produce the identical partition. Callers fix the
// input order (the collector sorts by filename) so a rerun over
// the same raw directory lands every sample in the same split.
//
// The training set takes floor(fraction * N) samples; the
// remainder is validation.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Shuffle `samples` with `seed` and split into (train, validation).
///
/// # Arguments
/// * `samples`        - All available samples, in a deterministic order
/// * `train_fraction` - Proportion for training, e.g. 0.8 = 80%
/// * `seed`           - RNG seed; same seed + same input = same split
pub fn split_train_val<T>(
    mut samples: Vec<T>,
    train_fraction: f64,
    seed: u64,
) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);

    // Fisher-Yates shuffle, every permutation equally likely
    samples.shuffle(&mut rng);

    // floor, so 7 samples at 0.8 give 5 train / 2 val
    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).floor() as usize;
    let split_at = split_at.min(total);

    // split_off(n) removes elements [n..] and returns them
    let val = samples.split_off(split_at);

    tracing::debug!(
        "split {} samples into {} train / {} val (seed {})",
        total,
        samples.len(),
        val.len(),
        seed,
    );

    (samples, val)
}
