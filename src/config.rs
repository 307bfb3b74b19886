//! Trainer configuration.
//!
//! [`TrainerConfig`] is assembled through [`TrainerConfigBuilder`]: the
//! required pieces go to [`TrainerConfig::builder`], the optional ones are
//! fluent setters, and [`TrainerConfigBuilder::build`] validates everything
//! before a run can start.
//!
//! # Example
//!
//! ```rust
//! use lasso_cv_trainer::config::{OutputTarget, TrainerConfig};
//! use lasso_cv_trainer::dataset::SampleSet;
//! use lasso_cv_trainer::solver::{LassoCv, LassoCvParams};
//!
//! let samples = SampleSet::from_rows(
//!     (0..10).map(|i| vec![i as f64, 1.0]).collect(),
//!     (0..10).map(|i| i as f64).collect(),
//!     (0..10).map(|i| format!("s{i}")).collect(),
//! )
//! .unwrap();
//!
//! let config = TrainerConfig::builder(
//!     samples,
//!     LassoCv::new(LassoCvParams::default().with_cv(3)).unwrap(),
//!     vec!["site_a".into(), "site_b".into()],
//!     OutputTarget::new("run1", "/tmp/").unwrap(),
//! )
//! .test_split(0.3)
//! .seed(42)
//! .build()
//! .unwrap();
//!
//! assert_eq!(config.sites().len(), 2);
//! ```

use std::path::PathBuf;

use crate::dataset::SampleSet;
use crate::error::{Result, TrainerError};
use crate::solver::Solver;
use crate::split::{TestSelection, DEFAULT_TEST_FRACTION};

/// Name of a regression site bound to its feature column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteBinding {
    pub label: String,
    pub column: usize,
}

impl SiteBinding {
    /// Bind `labels` to columns `0..n_features` in order.
    ///
    /// # Errors
    ///
    /// [`TrainerError::FeatureMismatch`] unless there is exactly one label per
    /// feature column.
    pub fn bind(labels: Vec<String>, n_features: usize) -> Result<Vec<SiteBinding>> {
        if labels.len() != n_features {
            return Err(TrainerError::FeatureMismatch {
                expected_features: n_features,
                got_features: labels.len(),
            });
        }
        Ok(labels
            .into_iter()
            .enumerate()
            .map(|(column, label)| SiteBinding { label, column })
            .collect())
    }
}

/// Where the model artifact and report go.
///
/// `directory` is a plain prefix: paths are `{directory}{name}.model` and
/// `{directory}{name}.model_info.txt`, so a directory should end with a
/// separator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputTarget {
    name: String,
    directory: String,
}

impl OutputTarget {
    pub fn new(name: impl Into<String>, directory: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(TrainerError::InvalidParameter(
                "output name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            name,
            directory: directory.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn model_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{}.model", self.directory, self.name))
    }

    pub fn report_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{}.model_info.txt", self.directory, self.name))
    }
}

/// Tolerances for deciding that a coefficient is zero.
///
/// A coefficient `c` counts as zero iff `|c| <= max(rel_tol * |c|, abs_tol)`.
/// With the defaults (`rel_tol = 1e-9`, `abs_tol = 0.0`) only an exact zero
/// qualifies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZeroTolerance {
    pub rel_tol: f64,
    pub abs_tol: f64,
}

impl Default for ZeroTolerance {
    /// Same test as Python's `math.isclose(c, 0)`: only an exact zero is close.
    fn default() -> Self {
        Self {
            rel_tol: 1e-9,
            abs_tol: 0.0,
        }
    }
}

impl ZeroTolerance {
    pub fn validate(&self) -> Result<()> {
        if !(self.rel_tol >= 0.0 && self.abs_tol >= 0.0) {
            return Err(TrainerError::InvalidParameter(format!(
                "zero tolerances must be non-negative, got rel_tol={} abs_tol={}",
                self.rel_tol, self.abs_tol
            )));
        }
        Ok(())
    }

    pub fn is_close_to_zero(&self, c: f64) -> bool {
        if !c.is_finite() {
            return false;
        }
        c.abs() <= (self.rel_tol * c.abs()).max(self.abs_tol)
    }
}

/// Validated inputs of one training run.
#[derive(Debug)]
pub struct TrainerConfig<S: Solver> {
    pub(crate) samples: SampleSet,
    pub(crate) solver: S,
    pub(crate) sites: Vec<SiteBinding>,
    pub(crate) selection: TestSelection,
    pub(crate) output: OutputTarget,
    pub(crate) seed: Option<u64>,
    pub(crate) zero_tolerance: ZeroTolerance,
}

impl<S: Solver> TrainerConfig<S> {
    /// Starts a builder with the required inputs.
    ///
    /// Equivalent to `TrainerConfigBuilder::new(...)`.
    pub fn builder(
        samples: SampleSet,
        solver: S,
        site_labels: Vec<String>,
        output: OutputTarget,
    ) -> TrainerConfigBuilder<S> {
        TrainerConfigBuilder::new(samples, solver, site_labels, output)
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn sites(&self) -> &[SiteBinding] {
        &self.sites
    }

    pub fn selection(&self) -> &TestSelection {
        &self.selection
    }

    pub fn output(&self) -> &OutputTarget {
        &self.output
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn zero_tolerance(&self) -> ZeroTolerance {
        self.zero_tolerance
    }
}

/// Fluent builder for [`TrainerConfig`].
///
/// Defaults:
/// - test selection: `Fraction(0.2)`
/// - seed: none (thread-local RNG)
///
/// Non-empty test labels win over in-sample evaluation, which wins over the
/// test fraction.
/// - zero tolerance: [`ZeroTolerance::default`]
#[derive(Debug)]
pub struct TrainerConfigBuilder<S: Solver> {
    samples: SampleSet,
    solver: S,
    site_labels: Vec<String>,
    output: OutputTarget,
    test_split: f64,
    test_labels: Option<Vec<String>>,
    in_sample: bool,
    seed: Option<u64>,
    zero_tolerance: ZeroTolerance,
}

impl<S: Solver> TrainerConfigBuilder<S> {
    /// # Arguments
    /// * `samples`: features, outcomes and labels of every sample
    /// * `solver`: fitting capability, e.g. [`crate::solver::LassoCv`]
    /// * `site_labels`: one name per feature column, in column order
    /// * `output`: artifact and report location
    pub fn new(samples: SampleSet, solver: S, site_labels: Vec<String>, output: OutputTarget) -> Self {
        Self {
            samples,
            solver,
            site_labels,
            output,
            test_split: DEFAULT_TEST_FRACTION,
            test_labels: None,
            in_sample: false,
            seed: None,
            zero_tolerance: ZeroTolerance::default(),
        }
    }

    /// Hold out `round(n * fraction)` randomly drawn samples. `0.0` means
    /// in-sample evaluation.
    pub fn test_split(mut self, fraction: f64) -> Self {
        self.test_split = fraction;
        self
    }

    /// Use exactly these sample labels as the Test partition. An empty list
    /// counts as not given.
    pub fn test_labels(mut self, labels: Vec<String>) -> Self {
        self.test_labels = Some(labels);
        self
    }

    /// Evaluate on the training data.
    pub fn in_sample(mut self) -> Self {
        self.in_sample = true;
        self
    }

    /// Seed for test-label sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn zero_tolerance(mut self, tolerance: ZeroTolerance) -> Self {
        self.zero_tolerance = tolerance;
        self
    }

    /// Validates and freezes the configuration.
    ///
    /// # Errors
    ///
    /// - [`TrainerError::FeatureMismatch`] if the site labels do not cover
    ///   the feature columns one to one
    /// - [`TrainerError::InvalidParameter`] for a bad test selection or zero
    ///   tolerance
    pub fn build(self) -> Result<TrainerConfig<S>> {
        let sites = SiteBinding::bind(self.site_labels, self.samples.n_features())?;
        let selection = match self.test_labels {
            Some(labels) if !labels.is_empty() => TestSelection::Labels(labels),
            explicit => {
                if explicit.is_some() {
                    log::warn!(
                        "explicit test label list is empty, using test split {}",
                        self.test_split
                    );
                }
                if self.in_sample {
                    TestSelection::InSample
                } else {
                    TestSelection::Fraction(self.test_split)
                }
            }
        };
        selection.validate()?;
        self.zero_tolerance.validate()?;

        Ok(TrainerConfig {
            samples: self.samples,
            solver: self.solver,
            sites,
            selection: selection.normalized(),
            output: self.output,
            seed: self.seed,
            zero_tolerance: self.zero_tolerance,
        })
    }
}
