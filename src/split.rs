//! Train/test partitioning of a [`SampleSet`].
//!
//! A [`TestSelection`] decides which sample labels form the Test partition;
//! [`partition`] then routes every sample by label, keeping the input order
//! inside each side.
//!
//! # Example
//!
//! ```rust
//! use lasso_cv_trainer::dataset::SampleSet;
//! use lasso_cv_trainer::split::{partition, TestSelection};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let labels: Vec<String> = (0..10).map(|i| format!("s{i}")).collect();
//! let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
//! let outcomes: Vec<f64> = (0..10).map(|i| i as f64 * 2.0).collect();
//! let samples = SampleSet::from_rows(rows, outcomes, labels).unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let split = partition(&samples, &TestSelection::Fraction(0.2), &mut rng).unwrap();
//! assert_eq!(split.test.len(), 2);
//! assert_eq!(split.train.len(), 8);
//! ```

use std::collections::HashSet;

use rand::seq::index;
use rand::Rng;

use crate::dataset::{Partition, SampleSet};
use crate::error::{Result, TrainerError};

/// Default share of samples held out for testing.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Test-split value written to the report when test labels were given explicitly.
pub const EXPLICIT_LABELS_FRACTION: f64 = 0.1;

/// How the Test partition is chosen.
#[derive(Clone, Debug, PartialEq)]
pub enum TestSelection {
    /// Draw `round(n * fraction)` labels uniformly without replacement.
    Fraction(f64),
    /// Use exactly these labels as Test membership.
    Labels(Vec<String>),
    /// Train on every sample and evaluate on the training data itself.
    InSample,
}

impl Default for TestSelection {
    fn default() -> Self {
        TestSelection::Fraction(DEFAULT_TEST_FRACTION)
    }
}

impl TestSelection {
    /// # Errors
    ///
    /// [`TrainerError::InvalidParameter`] for a fraction outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        match self {
            TestSelection::Fraction(f) if !(0.0..=1.0).contains(f) => Err(
                TrainerError::InvalidParameter(format!("test split must be in [0, 1], got {f}")),
            ),
            _ => Ok(()),
        }
    }

    /// Maps a zero fraction to [`TestSelection::InSample`] and an empty label
    /// list to the default fraction.
    pub fn normalized(self) -> Self {
        match self {
            TestSelection::Fraction(f) if f == 0.0 => {
                log::warn!("test split is 0: the model will be scored on its training data");
                TestSelection::InSample
            }
            TestSelection::Labels(labels) if labels.is_empty() => {
                log::warn!(
                    "explicit test label list is empty, drawing a {DEFAULT_TEST_FRACTION} test split"
                );
                TestSelection::Fraction(DEFAULT_TEST_FRACTION)
            }
            other => other,
        }
    }

    /// Fraction written to the report's `Test Split` entry.
    pub fn reported_fraction(&self) -> f64 {
        match self {
            TestSelection::Fraction(f) => *f,
            TestSelection::Labels(_) => EXPLICIT_LABELS_FRACTION,
            TestSelection::InSample => 0.0,
        }
    }
}

/// Number of test samples for `n` samples and `fraction`, rounding half to even.
pub fn test_set_size(n: usize, fraction: f64) -> usize {
    (n as f64 * fraction).round_ties_even() as usize
}

/// Resolve the set of labels that belong to the Test partition.
///
/// [`TestSelection::InSample`] resolves to an empty set: nothing is held out.
///
/// # Errors
///
/// [`TrainerError::Sampling`] if the fraction asks for more labels than exist.
pub fn resolve_test_labels<R: Rng + ?Sized>(
    selection: &TestSelection,
    labels: &[String],
    rng: &mut R,
) -> Result<HashSet<String>> {
    match selection {
        TestSelection::Labels(explicit) => {
            let known: HashSet<&str> = labels.iter().map(String::as_str).collect();
            let unknown = explicit
                .iter()
                .filter(|l| !known.contains(l.as_str()))
                .count();
            if unknown > 0 {
                log::warn!("{unknown} explicit test labels match no sample");
            }
            Ok(explicit.iter().cloned().collect())
        }
        TestSelection::Fraction(fraction) => {
            let size = test_set_size(labels.len(), *fraction);
            if size > labels.len() {
                return Err(TrainerError::Sampling(format!(
                    "cannot draw {size} test labels from {} samples",
                    labels.len()
                )));
            }
            Ok(index::sample(rng, labels.len(), size)
                .into_iter()
                .map(|i| labels[i].clone())
                .collect())
        }
        TestSelection::InSample => Ok(HashSet::new()),
    }
}

/// Train and Test partitions plus the fraction to report.
#[derive(Clone, Debug)]
pub struct Split {
    pub train: Partition,
    pub test: Partition,
    pub reported_fraction: f64,
}

/// Split `samples` into Train and Test according to `selection`.
///
/// A sample goes to Test iff its label is in the resolved test-label set.
/// Input order is preserved on both sides. `selection` is
/// [normalized](TestSelection::normalized) first, so a zero fraction behaves
/// like [`TestSelection::InSample`], where the Test partition is a copy of Train.
pub fn partition<R: Rng + ?Sized>(
    samples: &SampleSet,
    selection: &TestSelection,
    rng: &mut R,
) -> Result<Split> {
    let selection = selection.clone().normalized();
    selection.validate()?;
    let test_labels = resolve_test_labels(&selection, samples.labels(), rng)?;

    let (test_idx, train_idx): (Vec<usize>, Vec<usize>) =
        (0..samples.len()).partition(|&i| test_labels.contains(&samples.labels()[i]));

    let train = samples.select(&train_idx);
    let test = match selection {
        TestSelection::InSample => train.clone(),
        _ => samples.select(&test_idx),
    };

    Ok(Split {
        train,
        test,
        reported_fraction: selection.reported_fraction(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ten_samples() -> SampleSet {
        let labels: Vec<String> = (0..10).map(|i| format!("s{i}")).collect();
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64, (i * i) as f64]).collect();
        let outcomes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        SampleSet::from_rows(rows, outcomes, labels).unwrap()
    }

    fn names(part: &Partition) -> Vec<&str> {
        part.labels().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_set_size_rounds_half_to_even() {
        assert_eq!(test_set_size(10, 0.2), 2);
        assert_eq!(test_set_size(5, 0.5), 2);
        assert_eq!(test_set_size(7, 0.5), 4);
        assert_eq!(test_set_size(3, 0.0), 0);
        assert_eq!(test_set_size(3, 1.0), 3);
    }

    #[test]
    fn test_validate() {
        assert!(TestSelection::Fraction(0.0).validate().is_ok());
        assert!(TestSelection::Fraction(1.0).validate().is_ok());
        assert!(TestSelection::Fraction(-0.1).validate().is_err());
        assert!(TestSelection::Fraction(1.5).validate().is_err());
        assert!(TestSelection::Fraction(f64::NAN).validate().is_err());
        assert!(TestSelection::Labels(vec![]).validate().is_ok());
    }

    #[test]
    fn test_normalized_maps_zero_to_in_sample() {
        assert_eq!(TestSelection::Fraction(0.0).normalized(), TestSelection::InSample);
        assert_eq!(
            TestSelection::Fraction(0.3).normalized(),
            TestSelection::Fraction(0.3)
        );
    }

    #[test]
    fn test_normalized_maps_empty_labels_to_default_fraction() {
        assert_eq!(
            TestSelection::Labels(vec![]).normalized(),
            TestSelection::Fraction(DEFAULT_TEST_FRACTION)
        );
        let labels = TestSelection::Labels(vec!["s1".into()]);
        assert_eq!(labels.clone().normalized(), labels);
    }

    #[test]
    fn test_reported_fraction() {
        assert_eq!(TestSelection::default().reported_fraction(), 0.2);
        assert_eq!(
            TestSelection::Labels(vec!["s1".into()]).reported_fraction(),
            0.1
        );
        assert_eq!(TestSelection::InSample.reported_fraction(), 0.0);
    }

    #[test]
    fn test_fraction_draws_expected_count() {
        let samples = ten_samples();
        let mut rng = StdRng::seed_from_u64(42);

        let split = partition(&samples, &TestSelection::Fraction(0.2), &mut rng).unwrap();

        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);
        assert_eq!(split.reported_fraction, 0.2);
    }

    #[test]
    fn test_partitions_are_complete_and_disjoint() {
        let samples = ten_samples();
        let mut rng = StdRng::seed_from_u64(3);

        let split = partition(&samples, &TestSelection::Fraction(0.4), &mut rng).unwrap();

        let train: HashSet<&str> = names(&split.train).into_iter().collect();
        let test: HashSet<&str> = names(&split.test).into_iter().collect();
        assert!(train.is_disjoint(&test));
        let all: HashSet<&str> = train.union(&test).copied().collect();
        let expected: HashSet<&str> = samples.labels().iter().map(String::as_str).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_partitions_keep_rows_aligned_and_ordered() {
        let samples = ten_samples();
        let mut rng = StdRng::seed_from_u64(11);

        let split = partition(&samples, &TestSelection::Fraction(0.5), &mut rng).unwrap();

        for part in [&split.train, &split.test] {
            let mut last = None;
            for (row, label) in part.labels().iter().enumerate() {
                let i: usize = label[1..].parse().unwrap();
                assert_eq!(part.features()[[row, 0]], i as f64);
                assert_eq!(part.features()[[row, 1]], (i * i) as f64);
                assert_eq!(part.outcomes()[row], 100.0 + i as f64);
                assert!(last.map_or(true, |prev| prev < i));
                last = Some(i);
            }
        }
    }

    #[test]
    fn test_explicit_labels() {
        let samples = ten_samples();
        let selection = TestSelection::Labels(vec!["s3".into(), "s7".into()]);
        let mut rng = StdRng::seed_from_u64(0);

        let split = partition(&samples, &selection, &mut rng).unwrap();

        assert_eq!(names(&split.test), vec!["s3", "s7"]);
        assert_eq!(split.train.len(), 8);
        assert!(!names(&split.train).contains(&"s3"));
        assert_eq!(split.reported_fraction, 0.1);
    }

    #[test]
    fn test_explicit_labels_are_deterministic() {
        let samples = ten_samples();
        let selection = TestSelection::Labels(vec!["s7".into(), "s3".into()]);

        let a = partition(&samples, &selection, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = partition(&samples, &selection, &mut StdRng::seed_from_u64(2)).unwrap();

        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn test_unknown_explicit_labels_are_ignored() {
        let samples = ten_samples();
        let selection = TestSelection::Labels(vec!["s1".into(), "missing".into()]);

        let split = partition(&samples, &selection, &mut StdRng::seed_from_u64(0)).unwrap();

        assert_eq!(names(&split.test), vec!["s1"]);
        assert_eq!(split.train.len(), 9);
    }

    #[test]
    fn test_same_seed_same_split() {
        let samples = ten_samples();
        let selection = TestSelection::Fraction(0.3);

        let a = partition(&samples, &selection, &mut StdRng::seed_from_u64(99)).unwrap();
        let b = partition(&samples, &selection, &mut StdRng::seed_from_u64(99)).unwrap();

        assert_eq!(a.test.labels(), b.test.labels());
    }

    #[test]
    fn test_in_sample_test_equals_train() {
        let samples = ten_samples();

        let split =
            partition(&samples, &TestSelection::InSample, &mut StdRng::seed_from_u64(0)).unwrap();

        assert_eq!(split.train.len(), 10);
        assert_eq!(split.test, split.train);
        assert_eq!(split.reported_fraction, 0.0);
    }

    #[test]
    fn test_zero_fraction_partitions_in_sample() {
        let samples = ten_samples();

        let split = partition(
            &samples,
            &TestSelection::Fraction(0.0),
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();

        assert_eq!(split.train.len(), 10);
        assert_eq!(split.test, split.train);
        assert_eq!(split.reported_fraction, 0.0);
    }

    #[test]
    fn test_empty_labels_partition_by_default_fraction() {
        let samples = ten_samples();

        let split = partition(
            &samples,
            &TestSelection::Labels(vec![]),
            &mut StdRng::seed_from_u64(4),
        )
        .unwrap();

        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);
        assert_eq!(split.reported_fraction, DEFAULT_TEST_FRACTION);
    }

    #[test]
    fn test_full_fraction_leaves_train_empty() {
        let samples = ten_samples();

        let split = partition(
            &samples,
            &TestSelection::Fraction(1.0),
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();

        assert!(split.train.is_empty());
        assert_eq!(split.test.len(), 10);
    }

    #[test]
    fn test_resolve_in_sample_is_empty() {
        let labels = vec!["a".to_string()];
        let resolved =
            resolve_test_labels(&TestSelection::InSample, &labels, &mut StdRng::seed_from_u64(0))
                .unwrap();
        assert!(resolved.is_empty());
    }
}
