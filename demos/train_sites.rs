//! End-to-end example: select informative sites with a cross-validated Lasso
//!
//! This example:
//! - Builds a synthetic cohort of 60 samples x 8 sites, where only 3 sites
//!   drive the outcome
//! - Holds out 20% of the samples with a fixed seed
//! - Fits `LassoCv`, writes the `.model` artifact and the text report
//! - Reloads the artifact and checks it predicts the same values
//!
//! Run with: cargo run --example train_sites

use lasso_cv_trainer::prelude::*;
use std::error::Error;

const N_SAMPLES: usize = 60;
const N_SITES: usize = 8;

fn main() -> std::result::Result<(), Box<dyn Error>> {
    println!("=== Lasso site selection ===\n");

    // 1. Synthetic data: outcome = 40 + 25*site1 - 18*site4 + 10*site6 + jitter
    let rows: Vec<Vec<f64>> = (0..N_SAMPLES)
        .map(|i| {
            (0..N_SITES)
                .map(|j| {
                    let t = (i * (j + 3) + j * 7) as f64;
                    0.5 + 0.4 * (t * 0.37).sin()
                })
                .collect()
        })
        .collect();
    let outcomes: Vec<f64> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| 40.0 + 25.0 * r[1] - 18.0 * r[4] + 10.0 * r[6] + 0.05 * ((i % 5) as f64 - 2.0))
        .collect();
    let labels: Vec<String> = (0..N_SAMPLES).map(|i| format!("patient_{i:02}")).collect();
    let sites: Vec<String> = (0..N_SITES).map(|j| format!("cg{:08}", 1000 + j)).collect();

    let samples = SampleSet::from_rows(rows, outcomes, labels)?;
    println!(
        "Samples: {}, sites: {}",
        samples.len(),
        samples.n_features()
    );

    // 2. Configure the run
    let out_dir = tempfile::tempdir()?;
    let output = OutputTarget::new("demo_sites", format!("{}/", out_dir.path().display()))?;
    let solver = LassoCv::new(LassoCvParams::default().with_cv(5).with_n_alphas(50))?;

    // aprender fits in f32, so treat |c| <= 1e-6 as a dropped site
    let config = TrainerConfig::builder(samples, solver, sites, output)
        .test_split(0.2)
        .seed(2024)
        .zero_tolerance(ZeroTolerance {
            rel_tol: 1e-9,
            abs_tol: 1e-6,
        })
        .build()?;

    // 3. Run split -> fit -> evaluate -> report
    let run = ModelTrainer::new(config).run()?;
    println!("Selected alpha: {}", run.model.alpha());
    println!("Test R^2: {:.4}", run.stats.score);
    println!("Kept sites: {:?}\n", run.stats.regression_sites);

    // 4. Show the report
    println!("--- {} ---", run.report_path.display());
    print!("{}", std::fs::read_to_string(&run.report_path)?);

    // 5. Reload the artifact
    let loaded = FittedLasso::load_from_file(&run.model_path)?;
    let reloaded = loaded.predict_batch(run.test.features());
    assert_eq!(reloaded, run.stats.predicted);
    println!("\nReloaded model reproduces {} test predictions", reloaded.len());

    Ok(())
}
