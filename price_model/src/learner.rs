//! The learning capability and the bundled linear learner.

use ndarray::{Array1, Array2, ArrayView2, ArrayView3, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::{samples::Samples, timer::StageTimer};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LearnerError {
    #[error("learner has not been fitted")]
    NotFitted,

    #[error("no training samples")]
    EmptyTrainingSet,

    #[error("expected windows of {expected_window}x{expected_columns}, got {window}x{columns}")]
    ShapeMismatch {
        expected_window: usize,
        expected_columns: usize,
        window: usize,
        columns: usize,
    },

    #[error("invalid training config: {0}")]
    InvalidConfig(String),

    #[error("training diverged at epoch {epoch}")]
    Diverged { epoch: usize },
}

/// Training hyperparameters. The window length is implied by the samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainConfig {
    pub batch_size: usize,
    pub epochs: usize,
    pub learning_rate: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            epochs: 20,
            learning_rate: 0.001,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<(), LearnerError> {
        if self.batch_size == 0 {
            return Err(LearnerError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if self.epochs == 0 {
            return Err(LearnerError::InvalidConfig("epochs must be at least 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(LearnerError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// Mean squared training loss per epoch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    pub epoch_losses: Vec<f64>,
}

impl TrainingHistory {
    pub fn final_loss(&self) -> Option<f64> {
        self.epoch_losses.last().copied()
    }
}

/// Anything that maps `(count, window, columns)` inputs to one scaled close each.
///
/// Implementations call `timer.start(epoch)` / `timer.stop(epoch)` around
/// every epoch.
pub trait Learner {
    fn fit(
        &mut self,
        samples: &Samples,
        config: &TrainConfig,
        timer: &mut dyn StageTimer,
    ) -> Result<TrainingHistory, LearnerError>;

    fn predict(&self, inputs: ArrayView3<'_, f64>) -> Result<Array1<f64>, LearnerError>;
}

/// Linear regression over the flattened window, trained by mini-batch
/// gradient descent over the samples in chronological order.
#[derive(Debug, Clone, Default)]
pub struct LinearLearner {
    params: Option<LinearParams>,
}

#[derive(Debug, Clone)]
struct LinearParams {
    weights: Array2<f64>,
    bias: f64,
}

impl LinearParams {
    fn output(&self, window: ArrayView2<'_, f64>) -> f64 {
        window.iter().zip(self.weights.iter()).map(|(x, w)| x * w).sum::<f64>() + self.bias
    }
}

impl LinearLearner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.params.is_some()
    }
}

impl Learner for LinearLearner {
    fn fit(
        &mut self,
        samples: &Samples,
        config: &TrainConfig,
        timer: &mut dyn StageTimer,
    ) -> Result<TrainingHistory, LearnerError> {
        config.validate()?;
        if samples.is_empty() {
            return Err(LearnerError::EmptyTrainingSet);
        }

        let inputs = samples.inputs();
        let targets = samples.targets();
        let (n, window, columns) = inputs.dim();
        let mut params = LinearParams {
            weights: Array2::zeros((window, columns)),
            bias: 0.0,
        };
        let mut history = TrainingHistory::default();

        for epoch in 0..config.epochs {
            timer.start(epoch);
            let mut squared_error = 0.0;

            for batch_start in (0..n).step_by(config.batch_size) {
                let batch_end = (batch_start + config.batch_size).min(n);
                let mut grad_w = Array2::<f64>::zeros((window, columns));
                let mut grad_b = 0.0;

                for k in batch_start..batch_end {
                    let x = inputs.index_axis(Axis(0), k);
                    let err = params.output(x) - targets[k];
                    squared_error += err * err;
                    grad_w.scaled_add(err, &x);
                    grad_b += err;
                }

                let step = 2.0 * config.learning_rate / (batch_end - batch_start) as f64;
                params.weights.scaled_add(-step, &grad_w);
                params.bias -= step * grad_b;
            }

            timer.stop(epoch);
            let loss = squared_error / n as f64;
            if !loss.is_finite() {
                return Err(LearnerError::Diverged { epoch });
            }
            debug!(epoch, loss, "epoch finished");
            history.epoch_losses.push(loss);
        }

        info!(
            samples = n,
            epochs = config.epochs,
            final_loss = history.final_loss(),
            "linear learner fitted"
        );
        self.params = Some(params);
        Ok(history)
    }

    fn predict(&self, inputs: ArrayView3<'_, f64>) -> Result<Array1<f64>, LearnerError> {
        let params = self.params.as_ref().ok_or(LearnerError::NotFitted)?;
        let (_, window, columns) = inputs.dim();
        let (expected_window, expected_columns) = params.weights.dim();
        if (window, columns) != (expected_window, expected_columns) {
            return Err(LearnerError::ShapeMismatch {
                expected_window,
                expected_columns,
                window,
                columns,
            });
        }
        Ok(inputs.outer_iter().map(|x| params.output(x)).collect())
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array3;

    use super::*;
    use crate::{samples::build_samples, series::NormalizedSeries, timer::{EpochTimer, NoopTimer}};

    fn trending_samples() -> Samples {
        let raw = Array2::from_shape_fn((60, 5), |(i, j)| {
            let close = 100.0 + i as f64;
            match j {
                0 => close,
                1 => close - 0.5,
                2 => close + 1.0,
                3 => close - 1.0,
                _ => 1_000.0 + 10.0 * i as f64,
            }
        });
        let series = NormalizedSeries::from_raw(raw.view()).unwrap();
        build_samples(&series, 5, 0.8).unwrap()
    }

    #[test]
    fn loss_decreases() {
        let samples = trending_samples();
        let config = TrainConfig {
            batch_size: 4,
            epochs: 50,
            learning_rate: 0.01,
        };
        let mut learner = LinearLearner::new();
        let history = learner.fit(&samples, &config, &mut NoopTimer).unwrap();

        assert_eq!(history.epoch_losses.len(), 50);
        assert!(history.final_loss().unwrap() < history.epoch_losses[0]);
        assert!(learner.is_fitted());
    }

    #[test]
    fn times_every_epoch() {
        let samples = trending_samples();
        let config = TrainConfig { epochs: 3, ..TrainConfig::default() };
        let mut timer = EpochTimer::new();
        LinearLearner::new().fit(&samples, &config, &mut timer).unwrap();

        assert_eq!(timer.collect().len(), 3);
    }

    #[test]
    fn predicts_one_value_per_window() {
        let samples = trending_samples();
        let mut learner = LinearLearner::new();
        learner.fit(&samples, &TrainConfig::default(), &mut NoopTimer).unwrap();

        let predictions = learner.predict(samples.inputs()).unwrap();
        assert_eq!(predictions.len(), samples.len());
        assert!(predictions.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn predict_requires_fit_and_matching_shape() {
        let samples = trending_samples();
        let mut learner = LinearLearner::new();
        assert_eq!(learner.predict(samples.inputs()), Err(LearnerError::NotFitted));

        learner.fit(&samples, &TrainConfig::default(), &mut NoopTimer).unwrap();
        let wrong = Array3::<f64>::zeros((1, 4, 5));
        assert!(matches!(
            learner.predict(wrong.view()),
            Err(LearnerError::ShapeMismatch { expected_window: 5, window: 4, .. })
        ));
    }

    #[test]
    fn rejects_bad_config() {
        let samples = trending_samples();
        let config = TrainConfig { batch_size: 0, ..TrainConfig::default() };
        assert!(matches!(
            LinearLearner::new().fit(&samples, &config, &mut NoopTimer),
            Err(LearnerError::InvalidConfig(_))
        ));
    }
}
