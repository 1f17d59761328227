use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("no values to compare")]
    Empty,

    #[error("length mismatch: {predicted} predictions for {actual} actual values")]
    LengthMismatch { predicted: usize, actual: usize },
}

/// Root mean squared error.
pub fn rmse(predicted: &[f64], actual: &[f64]) -> Result<f64, MetricsError> {
    if predicted.len() != actual.len() {
        return Err(MetricsError::LengthMismatch {
            predicted: predicted.len(),
            actual: actual.len(),
        });
    }
    if predicted.is_empty() {
        return Err(MetricsError::Empty);
    }
    let sum: f64 = predicted.iter().zip(actual).map(|(p, a)| (p - a).powi(2)).sum();
    Ok((sum / predicted.len() as f64).sqrt())
}
