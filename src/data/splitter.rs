// ============================================================
// Layer 4 — Dataset Splitter
// ============================================================
// Carves the loaded example list into three fixed-size slices:
//   - Validation set: the FIRST `validation_size` examples
//   - Test set:       the LAST `test_size` examples
//   - Training set:   everything in between
//
// Why fixed slices instead of a shuffled percentage split?
//   The array file is produced by a deterministic conversion
//   step, so slicing by position keeps the three sets stable
//   across runs — the same examples always land in the same
//   slice, which makes loss curves comparable between runs.
//   Shuffling still happens, but later: the training DataLoader
//   shuffles within the training slice every epoch.
//
// Reference: Rust Book §8 (Vectors and Slices)

use anyhow::{bail, Result};

/// Default number of examples held out for validation.
pub const VALIDATION_SIZE: usize = 99;

/// Default number of examples held out for testing.
pub const TEST_SIZE: usize = 1000;

/// The three dataset slices produced by `split_fixed`.
#[derive(Debug)]
pub struct DatasetSplits<T> {
    pub train:      Vec<T>,
    pub validation: Vec<T>,
    pub test:       Vec<T>,
}

/// Split `examples` into fixed-size (validation, train, test) slices.
///
/// Order is preserved: validation is the head, test is the tail,
/// training is the middle. Errors if there are not enough examples
/// to leave at least one training example.
pub fn split_fixed<T>(
    mut examples:    Vec<T>,
    validation_size: usize,
    test_size:       usize,
) -> Result<DatasetSplits<T>> {
    let total = examples.len();

    if total < validation_size + test_size + 1 {
        bail!(
            "Dataset has {} examples but needs at least {} \
             ({} validation + {} test + 1 training)",
            total,
            validation_size + test_size + 1,
            validation_size,
            test_size
        );
    }

    // split_off(n) removes elements [n..] and returns them,
    // so we peel the tail first, then the head.
    let test = examples.split_off(total - test_size);
    let train = examples.split_off(validation_size);
    let validation = examples;

    tracing::debug!(
        "Dataset split: {} train, {} validation, {} test",
        train.len(),
        validation.len(),
        test.len(),
    );

    Ok(DatasetSplits { train, validation, test })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_slice_sizes() {
        let items: Vec<usize> = (0..500).collect();
        let splits = split_fixed(items, 99, 100).unwrap();
        assert_eq!(splits.validation.len(), 99);
        assert_eq!(splits.test.len(), 100);
        assert_eq!(splits.train.len(), 500 - 99 - 100);
    }

    #[test]
    fn test_order_is_preserved() {
        let items: Vec<usize> = (0..50).collect();
        let splits = split_fixed(items, 5, 10).unwrap();
        // Validation is the head, test is the tail, train the middle
        assert_eq!(splits.validation, (0..5).collect::<Vec<_>>());
        assert_eq!(splits.train, (5..40).collect::<Vec<_>>());
        assert_eq!(splits.test, (40..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_all_items_preserved() {
        let items: Vec<usize> = (0..200).collect();
        let splits = split_fixed(items, 20, 30).unwrap();
        let total = splits.train.len() + splits.validation.len() + splits.test.len();
        assert_eq!(total, 200);
    }

    #[test]
    fn test_undersized_dataset_errors() {
        // 99 + 1000 + 1 examples required — 500 is not enough
        let items: Vec<usize> = (0..500).collect();
        assert!(split_fixed(items, VALIDATION_SIZE, TEST_SIZE).is_err());
    }

    #[test]
    fn test_exactly_minimum_size() {
        let items: Vec<usize> = (0..16).collect();
        let splits = split_fixed(items, 5, 10).unwrap();
        assert_eq!(splits.train.len(), 1);
    }
}
