//! The training pipeline: split → fit → evaluate → report.
//!
//! [`ModelTrainer::run`] drives one run to completion. Each stage consumes the
//! previous one, so a stage cannot be repeated or skipped and a finished
//! trainer cannot be run again.
//!
//! # Example
//!
//! ```rust,no_run
//! use lasso_cv_trainer::config::{OutputTarget, TrainerConfig};
//! use lasso_cv_trainer::dataset::SampleSet;
//! use lasso_cv_trainer::solver::{LassoCv, LassoCvParams};
//! use lasso_cv_trainer::trainer::ModelTrainer;
//!
//! # fn main() -> lasso_cv_trainer::Result<()> {
//! let samples = SampleSet::from_rows(
//!     (0..30).map(|i| vec![i as f64, (i % 4) as f64]).collect(),
//!     (0..30).map(|i| 2.0 * i as f64 + 1.0).collect(),
//!     (0..30).map(|i| format!("s{i}")).collect(),
//! )?;
//! let config = TrainerConfig::builder(
//!     samples,
//!     LassoCv::new(LassoCvParams::default())?,
//!     vec!["site_a".into(), "site_b".into()],
//!     OutputTarget::new("sites", "output/")?,
//! )
//! .seed(1)
//! .build()?;
//!
//! let run = ModelTrainer::new(config).run()?;
//! println!("R^2 = {}", run.stats.score);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::TrainerConfig;
use crate::dataset::Partition;
use crate::error::Result;
use crate::model::InferenceModel;
use crate::report::{ModelReport, ModelStats};
use crate::solver::Solver;
use crate::split::{partition, Split};

/// Outcome of a completed run.
#[derive(Debug)]
pub struct TrainingRun<M> {
    pub model: M,
    pub stats: ModelStats,
    pub train: Partition,
    pub test: Partition,
    /// Test split as written to the report.
    pub test_fraction: f64,
    pub model_path: PathBuf,
    pub report_path: PathBuf,
}

/// Runs the training pipeline for one configuration.
#[derive(Debug)]
pub struct ModelTrainer<S: Solver> {
    config: TrainerConfig<S>,
}

impl<S: Solver> ModelTrainer<S> {
    pub fn new(config: TrainerConfig<S>) -> Self {
        Self { config }
    }

    /// Split the samples, fit the solver on Train, evaluate on Test, then
    /// write the model artifact followed by the report.
    ///
    /// # Errors
    ///
    /// Sampling, solver and I/O failures are returned unchanged. Files already
    /// written are left in place.
    pub fn run(self) -> Result<TrainingRun<S::Model>> {
        self.resolve_split()?.fit()?.evaluate().report()
    }

    fn resolve_split(self) -> Result<SplitResolved<S>> {
        let config = self.config;
        let split = match config.seed {
            Some(seed) => partition(
                &config.samples,
                &config.selection,
                &mut StdRng::seed_from_u64(seed),
            )?,
            None => partition(&config.samples, &config.selection, &mut rand::thread_rng())?,
        };
        log::info!(
            "{}: {} training and {} test samples",
            config.output.name(),
            split.train.len(),
            split.test.len()
        );
        Ok(SplitResolved { config, split })
    }
}

struct SplitResolved<S: Solver> {
    config: TrainerConfig<S>,
    split: Split,
}

impl<S: Solver> SplitResolved<S> {
    fn fit(self) -> Result<ModelFitted<S>> {
        let train = &self.split.train;
        let model = self
            .config
            .solver
            .fit(train.features(), train.outcomes())?;
        log::info!(
            "{}: fitted model on {} samples x {} features",
            self.config.output.name(),
            train.len(),
            self.config.samples.n_features()
        );
        Ok(ModelFitted {
            config: self.config,
            split: self.split,
            model,
        })
    }
}

struct ModelFitted<S: Solver> {
    config: TrainerConfig<S>,
    split: Split,
    model: S::Model,
}

impl<S: Solver> ModelFitted<S> {
    fn evaluate(self) -> Evaluated<S> {
        let stats = ModelStats::evaluate(
            &self.model,
            &self.config.sites,
            self.config.zero_tolerance,
            &self.split.test,
        );
        log::info!(
            "{}: R^2 = {} on {} test samples, {} of {} sites kept",
            self.config.output.name(),
            stats.score,
            self.split.test.len(),
            stats.regression_sites.len(),
            self.config.sites.len()
        );
        Evaluated {
            config: self.config,
            split: self.split,
            model: self.model,
            stats,
        }
    }
}

struct Evaluated<S: Solver> {
    config: TrainerConfig<S>,
    split: Split,
    model: S::Model,
    stats: ModelStats,
}

impl<S: Solver> Evaluated<S> {
    fn report(self) -> Result<TrainingRun<S::Model>> {
        let output = &self.config.output;
        let model_path = output.model_path();
        let report_path = output.report_path();

        self.model.save_to_file(&model_path)?;
        log::info!("wrote model artifact {}", model_path.display());

        let solver_params = self.config.solver.param_pairs();
        ModelReport {
            name: output.name(),
            stats: &self.stats,
            test_fraction: self.split.reported_fraction,
            solver_params: &solver_params,
            train: &self.split.train,
            test: &self.split.test,
        }
        .write_to(&report_path)?;
        log::info!("wrote model report {}", report_path.display());

        Ok(TrainingRun {
            model: self.model,
            stats: self.stats,
            train: self.split.train,
            test: self.split.test,
            test_fraction: self.split.reported_fraction,
            model_path,
            report_path,
        })
    }
}
