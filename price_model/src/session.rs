//! The pipeline as explicit stages.
//!
//! Each stage takes what the previous one returned; nothing is carried in
//! hidden state, so the stages cannot be run out of order.

use std::time::Duration;

use feed_reader::models::bar_table::BarTable;
use ndarray::ArrayView3;
use tracing::info;

use crate::{
    config::WindowConfig,
    errors::Error,
    learner::{Learner, TrainConfig, TrainingHistory},
    metrics::{MetricsError, rmse},
    samples::{Samples, build_holdout, build_samples, latest_window},
    series::NormalizedSeries,
    timer::StageTimer,
};

/// Output of [`prepare`].
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub series: NormalizedSeries,
    pub train: Samples,
    pub holdout: Samples,
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub history: TrainingHistory,
    pub epoch_times: Vec<Duration>,
    pub total: Duration,
}

/// Holdout error in price units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub rmse: f64,
    pub samples: usize,
}

/// Scales the table and splits it into training and holdout samples.
pub fn prepare(table: &BarTable, window: &WindowConfig) -> Result<PreparedData, Error> {
    let series = NormalizedSeries::from_table(table)?;
    let train = build_samples(&series, window.window_length, window.train_fraction)?;
    let holdout = build_holdout(&series, window.window_length, window.train_fraction)?;

    info!(
        symbol = table.symbol(),
        rows = series.rows(),
        window_length = window.window_length,
        train = train.len(),
        holdout = holdout.len(),
        "prepared samples"
    );
    Ok(PreparedData { series, train, holdout })
}

pub fn train<L: Learner + ?Sized>(
    learner: &mut L,
    data: &PreparedData,
    config: &TrainConfig,
    timer: &mut dyn StageTimer,
) -> Result<TrainingReport, Error> {
    let history = learner.fit(&data.train, config, timer)?;
    // A reused timer still holds laps from earlier runs.
    let laps = timer.collect();
    let epoch_times = laps[laps.len().saturating_sub(history.epoch_losses.len())..].to_vec();
    let total: Duration = epoch_times.iter().sum();

    info!("{:.3} seconds to train {} epochs", total.as_secs_f64(), history.epoch_losses.len());
    Ok(TrainingReport {
        history,
        epoch_times,
        total,
    })
}

/// Runs the learner and converts its scaled outputs back to prices.
pub fn predict_prices<L: Learner + ?Sized>(
    learner: &L,
    series: &NormalizedSeries,
    inputs: ArrayView3<'_, f64>,
) -> Result<Vec<f64>, Error> {
    let scaled = learner.predict(inputs)?;
    Ok(scaled.iter().map(|&v| series.invert_price(v)).collect())
}

/// Predicted close for the row after the last one in the series.
pub fn predict_next<L: Learner + ?Sized>(
    learner: &L,
    series: &NormalizedSeries,
    window_length: usize,
) -> Result<f64, Error> {
    let window = latest_window(series, window_length)?;
    let prices = predict_prices(learner, series, window.view())?;
    prices.first().copied().ok_or(Error::Metrics(MetricsError::Empty))
}

/// RMSE of the learner over the holdout, in price units.
pub fn evaluate<L: Learner + ?Sized>(
    learner: &L,
    data: &PreparedData,
) -> Result<Evaluation, Error> {
    if data.holdout.is_empty() {
        return Err(MetricsError::Empty.into());
    }
    let predicted = predict_prices(learner, &data.series, data.holdout.inputs())?;
    let actual: Vec<f64> =
        data.holdout.targets().iter().map(|&v| data.series.invert_price(v)).collect();
    let rmse = rmse(&predicted, &actual)?;

    info!(rmse, samples = actual.len(), "holdout evaluation");
    Ok(Evaluation {
        rmse,
        samples: actual.len(),
    })
}
