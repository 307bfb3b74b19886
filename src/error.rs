//! Error types for the training pipeline.

use thiserror::Error;

/// Error type for every stage of a training run.
#[derive(Debug, Error)]
pub enum TrainerError {
    /// Invalid hyperparameter or configuration value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),
    /// Shape mismatch between expected and actual dimensions.
    #[error("Invalid shape: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },
    /// Feature dimension mismatch.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// Test-set sampling could not be satisfied.
    #[error("Sampling error: {0}")]
    Sampling(String),
    /// Numerical computation error (non-finite input, etc.).
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// The underlying Lasso estimator refused the data.
    #[error("Solver error: {0}")]
    Solver(String),
    /// I/O error during artifact or report writes.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Model artifact (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
    /// Malformed JSON configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TrainerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_parameter() {
        let err = TrainerError::InvalidParameter("cv must be >= 2".to_string());
        assert!(err.to_string().contains("Invalid parameter"));
        assert!(err.to_string().contains("cv must be >= 2"));
    }

    #[test]
    fn test_error_display_feature_mismatch() {
        let err = TrainerError::FeatureMismatch {
            expected_features: 5,
            got_features: 3,
        };
        assert_eq!(
            err.to_string(),
            "Feature mismatch: expected 5 features, got 3"
        );
    }

    #[test]
    fn test_error_display_shape_mismatch() {
        let err = TrainerError::ShapeMismatch {
            expected: "10 outcomes".to_string(),
            got: "9".to_string(),
        };
        assert!(err.to_string().contains("Invalid shape"));
    }

    #[test]
    fn test_error_display_solver() {
        let err = TrainerError::Solver("Matrix dimensions don't match".to_string());
        assert_eq!(err.to_string(), "Solver error: Matrix dimensions don't match");
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: TrainerError = io_err.into();
        assert!(matches!(err, TrainerError::Io(_)));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let result: std::result::Result<String, bincode::Error> = bincode::deserialize(bad_bytes);
        if let Err(e) = result {
            let err: TrainerError = e.into();
            assert!(matches!(err, TrainerError::Serialization(_)));
        }
    }

    #[test]
    fn test_error_from_json_error() {
        let result: std::result::Result<u32, serde_json::Error> = serde_json::from_str("{");
        let err: TrainerError = result.unwrap_err().into();
        assert!(matches!(err, TrainerError::Config(_)));
    }

    #[test]
    fn test_error_is_std_error() {
        let err = TrainerError::Sampling("too many".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
