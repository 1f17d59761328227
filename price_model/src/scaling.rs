//! Min-max scaling to `[0, 1]`, fitted per column.
//!
//! `inverse_transform(fit_transform(a)) == a` up to floating-point rounding.
//! A constant column is scaled with a span of 1, so it maps to 0 and inverts
//! back to the constant.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("cannot fit a scaler on an empty array")]
    Empty,

    #[error("non-finite value at row {row}, column {column}")]
    NonFinite { row: usize, column: usize },

    /// `max - min` of a column does not fit in an `f64`.
    #[error("range of column {column} overflows")]
    RangeOverflow { column: usize },

    #[error("expected {expected} columns, got {found}")]
    ColumnMismatch { expected: usize, found: usize },
}

/// Observed range of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
}

impl ColumnRange {
    /// Divisor used by the transform.
    pub fn span(&self) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 { 1.0 } else { span }
    }

    pub fn scale(&self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }

    pub fn invert(&self, scaled: f64) -> f64 {
        scaled * self.span() + self.min
    }
}

/// Fitted parameters of a min-max transform. Never changes after [`FitState::fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitState {
    columns: Vec<ColumnRange>,
}

impl FitState {
    pub fn fit(data: ArrayView2<'_, f64>) -> Result<Self, ScaleError> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(ScaleError::Empty);
        }
        if let Some(((row, column), _)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ScaleError::NonFinite { row, column });
        }

        let mut columns = Vec::with_capacity(data.ncols());
        for (column, values) in data.columns().into_iter().enumerate() {
            let range = ColumnRange {
                min: values.fold(f64::INFINITY, |acc, &v| acc.min(v)),
                max: values.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v)),
            };
            if !(range.max - range.min).is_finite() {
                return Err(ScaleError::RangeOverflow { column });
            }
            columns.push(range);
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnRange] {
        &self.columns
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    fn check_width(&self, data: &ArrayView2<'_, f64>) -> Result<(), ScaleError> {
        if data.ncols() == self.columns.len() {
            Ok(())
        } else {
            Err(ScaleError::ColumnMismatch {
                expected: self.columns.len(),
                found: data.ncols(),
            })
        }
    }

    pub fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScaleError> {
        self.check_width(&data)?;
        let mut out = data.to_owned();
        for (mut col, range) in out.columns_mut().into_iter().zip(&self.columns) {
            col.mapv_inplace(|v| range.scale(v));
        }
        Ok(out)
    }

    pub fn inverse_transform(
        &self,
        scaled: ArrayView2<'_, f64>,
    ) -> Result<Array2<f64>, ScaleError> {
        self.check_width(&scaled)?;
        let mut out = scaled.to_owned();
        for (mut col, range) in out.columns_mut().into_iter().zip(&self.columns) {
            col.mapv_inplace(|v| range.invert(v));
        }
        Ok(out)
    }

    /// Inverts a single scaled value of `column`.
    pub fn invert_value(&self, column: usize, scaled: f64) -> Result<f64, ScaleError> {
        let range = self.columns.get(column).ok_or(ScaleError::ColumnMismatch {
            expected: self.columns.len(),
            found: column + 1,
        })?;
        Ok(range.invert(scaled))
    }
}

/// Fits on `data` and returns it scaled together with the fit.
pub fn fit_transform(data: ArrayView2<'_, f64>) -> Result<(Array2<f64>, FitState), ScaleError> {
    let fit = FitState::fit(data)?;
    let scaled = fit.transform(data)?;
    Ok((scaled, fit))
}

pub fn inverse_transform(
    scaled: ArrayView2<'_, f64>,
    fit: &FitState,
) -> Result<Array2<f64>, ScaleError> {
    fit.inverse_transform(scaled)
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn scales_each_column_to_unit_range() {
        let data = array![[1.0, 100.0], [3.0, 300.0], [2.0, 200.0]];
        let (scaled, fit) = fit_transform(data.view()).unwrap();

        assert_eq!(scaled, array![[0.0, 0.0], [1.0, 1.0], [0.5, 0.5]]);
        assert_eq!(fit.columns()[1], ColumnRange { min: 100.0, max: 300.0 });
    }

    #[test]
    fn round_trip() {
        let data = array![[421.5, 16_900_000.0], [418.25, 20_500_000.0], [430.0, 12_000_000.0]];
        let (scaled, fit) = fit_transform(data.view()).unwrap();
        let back = inverse_transform(scaled.view(), &fit).unwrap();

        for (a, b) in data.iter().zip(back.iter()) {
            assert!((a - b).abs() <= 1e-9 * a.abs().max(1.0), "{a} vs {b}");
        }
    }

    #[test]
    fn constant_column() {
        let data = array![[5.0], [5.0]];
        let (scaled, fit) = fit_transform(data.view()).unwrap();
        assert_eq!(scaled, array![[0.0], [0.0]]);
        assert_eq!(fit.invert_value(0, 0.0).unwrap(), 5.0);
    }

    #[test]
    fn rejects_bad_input() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert_eq!(FitState::fit(empty.view()), Err(ScaleError::Empty));

        let nan = array![[1.0, f64::NAN]];
        assert_eq!(
            FitState::fit(nan.view()),
            Err(ScaleError::NonFinite { row: 0, column: 1 })
        );

        let fit = FitState::fit(array![[1.0, 2.0]].view()).unwrap();
        assert_eq!(
            fit.transform(array![[1.0]].view()),
            Err(ScaleError::ColumnMismatch { expected: 2, found: 1 })
        );
        assert!(fit.invert_value(2, 0.5).is_err());
    }

    #[test]
    fn rejects_range_wider_than_f64() {
        let data = array![[-1e308, 1.0], [1e308, 2.0]];
        assert_eq!(fit_transform(data.view()), Err(ScaleError::RangeOverflow { column: 0 }));

        let wide_but_finite = array![[-8e307], [8e307]];
        let (scaled, fit) = fit_transform(wide_but_finite.view()).unwrap();
        assert_eq!(fit.inverse_transform(scaled.view()).unwrap(), wide_but_finite);
    }

    #[test]
    fn values_outside_fit_extrapolate() {
        let fit = FitState::fit(array![[10.0], [20.0]].view()).unwrap();
        let scaled = fit.transform(array![[25.0]].view()).unwrap();
        assert_eq!(scaled[[0, 0]], 1.5);
    }
}
