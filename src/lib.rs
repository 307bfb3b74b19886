//! # lasso-cv-trainer
//!
//! Train/test partitioning, cross-validated Lasso fitting and plain-text model
//! reports for labeled feature matrices.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: models carry their training state in the type
//!   system (`Unfitted` vs `Fitted`); only fitted models predict or persist.
//! - **Solver as a Capability**: the pipeline only needs `fit(X, y) -> model`
//!   through the [`solver::Solver`] trait. [`solver::LassoCv`] is the bundled
//!   implementation; the regression math itself comes from `aprender`.
//! - **One-Shot Runs**: a [`trainer::ModelTrainer`] consumes its configuration
//!   and moves through split → fit → evaluate → report exactly once.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lasso_cv_trainer::prelude::*;
//!
//! # fn main() -> lasso_cv_trainer::Result<()> {
//! let samples = SampleSet::from_rows(
//!     vec![vec![0.1, 1.0], vec![0.4, 0.0], vec![0.3, 1.0], vec![0.9, 0.0], vec![0.5, 1.0]],
//!     vec![1.2, 1.9, 2.1, 3.0, 2.4],
//!     vec!["p1".into(), "p2".into(), "p3".into(), "p4".into(), "p5".into()],
//! )?;
//!
//! let config = TrainerConfig::builder(
//!     samples,
//!     LassoCv::new(LassoCvParams::default().with_cv(2))?,
//!     vec!["cg0001".into(), "cg0002".into()],
//!     OutputTarget::new("age_model", "results/")?,
//! )
//! .test_labels(vec!["p3".into()])
//! .build()?;
//!
//! // Writes results/age_model.model and results/age_model.model_info.txt
//! let run = ModelTrainer::new(config).run()?;
//! println!("kept sites: {:?}", run.stats.regression_sites);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: validated sample sets and train/test partitions
//! - `split`: test-set selection and stable partitioning
//! - `solver`: `Solver` trait, CV alpha selection over `aprender`'s Lasso
//! - `model`: linear models with stateful type parameters
//! - `config`: run configuration and its builder
//! - `report`: model statistics and the text report
//! - `trainer`: pipeline orchestration
//!
//! The library logs through the `log` facade and never installs a logger.

/// Run configuration: site bindings, output target, builder.
pub mod config;

/// Labeled sample containers.
pub mod dataset;

pub mod error;

/// Regression metrics.
pub mod metrics;

/// Linear models with compile-time state safety.
pub mod model;

/// Model statistics and text report.
pub mod report;

/// Model persistence utilities.
pub mod serialization;

/// Regression solvers.
pub mod solver;

/// Train/test partitioning.
pub mod split;

/// Training pipeline orchestration.
pub mod trainer;

pub use error::{Result, TrainerError};

/// Commonly used types.
pub mod prelude {
    pub use crate::config::{OutputTarget, SiteBinding, TrainerConfig, ZeroTolerance};
    pub use crate::dataset::{Partition, SampleSet};
    pub use crate::error::{Result, TrainerError};
    pub use crate::model::InferenceModel;
    pub use crate::solver::{FittedLasso, LassoCv, LassoCvParams, Solver};
    pub use crate::split::TestSelection;
    pub use crate::trainer::{ModelTrainer, TrainingRun};
}
