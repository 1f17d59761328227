//! Sliding-window supervised samples.
//!
//! For window length `w`, the sample with target row `i` takes rows
//! `[i - w, i)` of every column as input and the close at row `i` as target.
//! Training samples cover target rows `w..cutoff` where
//! `cutoff = ceil(rows * train_fraction)`; the holdout covers the rest.

use std::ops::Range;

use ndarray::{Array1, Array3, ArrayView1, ArrayView2, ArrayView3, Axis, s};

use crate::{errors::Error, series::{CLOSE, NormalizedSeries}};

/// Inputs of shape `(count, window_length, columns)` with one target each.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    inputs: Array3<f64>,
    targets: Array1<f64>,
    first_target_row: usize,
}

/// A borrowed view of one sample.
#[derive(Debug, Clone, Copy)]
pub struct WindowSample<'a> {
    pub input: ArrayView2<'a, f64>,
    pub target: f64,
    /// Series row the target came from.
    pub target_row: usize,
}

impl Samples {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn window_length(&self) -> usize {
        self.inputs.dim().1
    }

    pub fn n_columns(&self) -> usize {
        self.inputs.dim().2
    }

    pub fn inputs(&self) -> ArrayView3<'_, f64> {
        self.inputs.view()
    }

    pub fn targets(&self) -> ArrayView1<'_, f64> {
        self.targets.view()
    }

    /// Series rows the targets were taken from.
    pub fn target_rows(&self) -> Range<usize> {
        self.first_target_row..self.first_target_row + self.len()
    }

    pub fn get(&self, index: usize) -> Option<WindowSample<'_>> {
        (index < self.len()).then(|| WindowSample {
            input: self.inputs.index_axis(Axis(0), index),
            target: self.targets[index],
            target_row: self.first_target_row + index,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = WindowSample<'_>> + '_ {
        (0..self.len()).filter_map(|k| self.get(k))
    }
}

/// Number of leading rows that belong to the training split.
pub fn training_cutoff(rows: usize, train_fraction: f64) -> usize {
    ((rows as f64 * train_fraction).ceil() as usize).min(rows)
}

fn validate(rows: usize, window_length: usize, train_fraction: f64) -> Result<usize, Error> {
    if window_length == 0 {
        return Err(Error::InvalidWindowLength);
    }
    if !(train_fraction > 0.0 && train_fraction <= 1.0) {
        return Err(Error::InvalidTrainFraction(train_fraction));
    }
    let cutoff = training_cutoff(rows, train_fraction);
    if rows <= window_length {
        return Err(Error::InsufficientData { rows, cutoff, window_length });
    }
    Ok(cutoff)
}

/// Builds the training samples, oldest first.
///
/// A cutoff that falls inside the first window yields no samples.
pub fn build_samples(
    series: &NormalizedSeries,
    window_length: usize,
    train_fraction: f64,
) -> Result<Samples, Error> {
    let cutoff = validate(series.rows(), window_length, train_fraction)?;
    Ok(windows(series.data(), window_length, window_length..cutoff.max(window_length)))
}

/// Builds the samples whose targets fall after the training cutoff. May be empty.
pub fn build_holdout(
    series: &NormalizedSeries,
    window_length: usize,
    train_fraction: f64,
) -> Result<Samples, Error> {
    let rows = series.rows();
    let cutoff = validate(rows, window_length, train_fraction)?;
    Ok(windows(series.data(), window_length, cutoff.max(window_length)..rows))
}

/// The last `window_length` rows as one input of shape `(1, window_length, columns)`.
pub fn latest_window(
    series: &NormalizedSeries,
    window_length: usize,
) -> Result<Array3<f64>, Error> {
    let rows = series.rows();
    if window_length == 0 {
        return Err(Error::InvalidWindowLength);
    }
    if rows < window_length {
        return Err(Error::InsufficientData { rows, cutoff: rows, window_length });
    }
    Ok(series
        .data()
        .slice(s![rows - window_length.., ..])
        .to_owned()
        .insert_axis(Axis(0)))
}

fn windows(data: ArrayView2<'_, f64>, window_length: usize, target_rows: Range<usize>) -> Samples {
    let count = target_rows.len();
    let mut inputs = Array3::zeros((count, window_length, data.ncols()));
    let mut targets = Array1::zeros(count);

    for (k, i) in target_rows.clone().enumerate() {
        inputs
            .index_axis_mut(Axis(0), k)
            .assign(&data.slice(s![i - window_length..i, ..]));
        targets[k] = data[[i, CLOSE]];
    }

    Samples {
        inputs,
        targets,
        first_target_row: target_rows.start,
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use super::*;

    /// Close rises by one per row, the other columns are constant.
    fn series(rows: usize) -> NormalizedSeries {
        let raw =
            Array2::from_shape_fn((rows, 5), |(i, j)| if j == CLOSE { i as f64 } else { 1.0 });
        NormalizedSeries::from_raw(raw.view()).unwrap()
    }

    #[test]
    fn windows_are_chronological() {
        let series = series(10);
        let samples = build_samples(&series, 3, 1.0).unwrap();

        assert_eq!(samples.len(), 7);
        assert_eq!(samples.window_length(), 3);
        assert_eq!(samples.n_columns(), 5);

        let first = samples.get(0).unwrap();
        assert_eq!(first.input, series.data().slice(s![0..3, ..]));
        assert_eq!(first.target, series.data()[[3, CLOSE]]);
        assert_eq!(first.target_row, 3);

        let last = samples.get(6).unwrap();
        assert_eq!(last.target, series.data()[[9, CLOSE]]);
        assert_eq!(last.target, 1.0);
        assert_eq!(samples.target_rows(), 3..10);
    }

    #[test]
    fn train_fraction_rounds_up() {
        let series = series(10);
        // ceil(10 * 0.75) = 8
        let train = build_samples(&series, 3, 0.75).unwrap();
        let holdout = build_holdout(&series, 3, 0.75).unwrap();

        assert_eq!(train.len(), 5);
        assert_eq!(holdout.target_rows(), 8..10);
        assert_eq!(holdout.get(0).unwrap().input, series.data().slice(s![5..8, ..]));
    }

    #[test]
    fn rows_equal_to_window_is_insufficient() {
        let series = series(5);
        assert!(matches!(
            build_samples(&series, 5, 1.0),
            Err(Error::InsufficientData { rows: 5, window_length: 5, .. })
        ));
    }

    #[test]
    fn cutoff_inside_first_window_yields_no_samples() {
        let series = series(10);
        assert_eq!(training_cutoff(10, 0.5), 5);

        let train = build_samples(&series, 5, 0.5).unwrap();
        assert!(train.is_empty());
        assert_eq!(train.inputs().dim(), (0, 5, 5));

        let train = build_samples(&series, 8, 0.5).unwrap();
        assert_eq!(train.len(), 0);
        assert_eq!(train.target_rows(), 8..8);

        // the holdout still exists
        assert_eq!(build_holdout(&series, 5, 0.5).unwrap().len(), 5);
    }

    #[test]
    fn rejects_bad_parameters() {
        let series = series(10);
        assert!(matches!(build_samples(&series, 0, 0.8), Err(Error::InvalidWindowLength)));
        assert!(matches!(build_samples(&series, 3, 0.0), Err(Error::InvalidTrainFraction(_))));
        assert!(matches!(build_samples(&series, 3, 1.5), Err(Error::InvalidTrainFraction(_))));
        assert!(matches!(build_samples(&series, 3, f64::NAN), Err(Error::InvalidTrainFraction(_))));
    }

    #[test]
    fn full_training_split_has_empty_holdout() {
        let holdout = build_holdout(&series(10), 3, 1.0).unwrap();
        assert!(holdout.is_empty());
        assert_eq!(holdout.inputs().dim(), (0, 3, 5));
    }

    #[test]
    fn latest_window_is_the_tail() {
        let series = series(10);
        let window = latest_window(&series, 4).unwrap();

        assert_eq!(window.dim(), (1, 4, 5));
        assert_eq!(window.index_axis(Axis(0), 0), series.data().slice(s![6..10, ..]));
        assert!(latest_window(&series, 11).is_err());
    }
}
