//! Metrics for evaluating regression models.

use ndarray::ArrayView1;

/// Calculate Mean Squared Error (MSE).
///
/// MSE = mean((y_true - y_pred)^2)
///
/// Returns `NaN` for empty inputs.
///
/// # Panics
///
/// If `y_true` and `y_pred` have different lengths.
pub fn mean_squared_error(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "Arrays must have the same length"
    );

    if y_true.is_empty() {
        return f64::NAN;
    }

    let sum_sq: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p).powi(2))
        .sum();

    sum_sq / y_true.len() as f64
}

/// Calculate R² (coefficient of determination).
///
/// R² = 1 - (SS_res / SS_tot)
///
/// where:
/// - SS_res = sum((y_true - y_pred)^2)  (residual sum of squares)
/// - SS_tot = sum((y_true - mean(y_true))^2)  (total sum of squares)
///
/// Values can be negative if the model is arbitrarily worse than the mean.
/// A constant `y_true` scores 1.0 when predicted exactly and 0.0 otherwise.
/// Empty inputs score `NaN`.
///
/// # Panics
///
/// If `y_true` and `y_pred` have different lengths.
pub fn r2_score(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "Arrays must have the same length"
    );

    if y_true.is_empty() {
        return f64::NAN;
    }

    let mean_true = y_true.sum() / y_true.len() as f64;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&t, &p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|&t| (t - mean_true).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mse_perfect_prediction() {
        let y = array![1.0, 2.0, 3.0];
        assert_eq!(mean_squared_error(y.view(), y.view()), 0.0);
    }

    #[test]
    fn test_mse_known_value() {
        let y_true = array![1.0, 2.0, 3.0, 4.0];
        let y_pred = array![2.0, 2.0, 3.0, 2.0];
        // (1 + 0 + 0 + 4) / 4
        assert!((mean_squared_error(y_true.view(), y_pred.view()) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_r2_perfect_prediction() {
        let y = array![1.0, 2.0, 3.0, 4.0];
        assert_eq!(r2_score(y.view(), y.view()), 1.0);
    }

    #[test]
    fn test_r2_mean_prediction_is_zero() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![2.0, 2.0, 2.0];
        assert!(r2_score(y_true.view(), y_pred.view()).abs() < 1e-12);
    }

    #[test]
    fn test_r2_can_be_negative() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![3.0, 2.0, 1.0];
        // ss_res = 8, ss_tot = 2
        assert!((r2_score(y_true.view(), y_pred.view()) + 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_r2_constant_target() {
        let y_true = array![5.0, 5.0];
        assert_eq!(r2_score(y_true.view(), array![5.0, 5.0].view()), 1.0);
        assert_eq!(r2_score(y_true.view(), array![4.0, 6.0].view()), 0.0);
    }

    #[test]
    fn test_empty_inputs_are_nan() {
        let empty = ndarray::Array1::<f64>::zeros(0);
        assert!(r2_score(empty.view(), empty.view()).is_nan());
        assert!(mean_squared_error(empty.view(), empty.view()).is_nan());
    }

    #[test]
    #[should_panic(expected = "Arrays must have the same length")]
    fn test_length_mismatch_panics() {
        r2_score(array![1.0, 2.0].view(), array![1.0].view());
    }
}
