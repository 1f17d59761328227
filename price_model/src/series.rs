use feed_reader::models::bar_table::BarTable;
use ndarray::{Array2, ArrayView1, ArrayView2, s};

use crate::{
    errors::Error,
    scaling::{ColumnRange, FitState, ScaleError, fit_transform},
};

/// Column order of a [`NormalizedSeries`].
pub const COLUMNS: [&str; 5] = ["close", "open", "high", "low", "volume"];

/// Index of the close column, the prediction target.
pub const CLOSE: usize = 0;

/// A bar table reduced to a scaled `rows × 5` matrix.
///
/// The close column is fitted on its own so predictions can be inverted
/// without the other columns. Open, high, low and volume share a second fit.
#[derive(Debug, Clone)]
pub struct NormalizedSeries {
    data: Array2<f64>,
    close_fit: FitState,
    feature_fit: FitState,
}

impl NormalizedSeries {
    pub fn from_table(table: &BarTable) -> Result<Self, Error> {
        let raw = Array2::from_shape_fn((table.len(), COLUMNS.len()), |(i, j)| {
            let bar = &table[i];
            match j {
                0 => bar.close,
                1 => bar.open,
                2 => bar.high,
                3 => bar.low,
                _ => bar.volume,
            }
        });
        Self::from_raw(raw.view())
    }

    /// Builds from unscaled values already in [`COLUMNS`] order.
    pub fn from_raw(raw: ArrayView2<'_, f64>) -> Result<Self, Error> {
        if raw.ncols() != COLUMNS.len() {
            return Err(ScaleError::ColumnMismatch {
                expected: COLUMNS.len(),
                found: raw.ncols(),
            }
            .into());
        }

        let (close, close_fit) = fit_transform(raw.slice(s![.., ..1]))?;
        let (features, feature_fit) = fit_transform(raw.slice(s![.., 1..]))?;

        let mut data = Array2::zeros(raw.raw_dim());
        data.slice_mut(s![.., ..1]).assign(&close);
        data.slice_mut(s![.., 1..]).assign(&features);

        Ok(Self { data, close_fit, feature_fit })
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn data(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.rows()).then(|| self.data.row(index))
    }

    pub fn close_fit(&self) -> &FitState {
        &self.close_fit
    }

    pub fn feature_fit(&self) -> &FitState {
        &self.feature_fit
    }

    fn close_range(&self) -> ColumnRange {
        // A successful fit always holds one range per column.
        self.close_fit.columns()[0]
    }

    /// Converts one scaled close back to price units.
    pub fn invert_price(&self, scaled: f64) -> f64 {
        self.close_range().invert(scaled)
    }

    pub fn invert_close(&self, scaled: &[f64]) -> Vec<f64> {
        let range = self.close_range();
        scaled.iter().map(|&v| range.invert(v)).collect()
    }
}

/// Inverse of the close-column fit, for callers that kept only the fit.
pub fn invert_price(scaled: f64, fit: &FitState) -> Result<f64, ScaleError> {
    fit.invert_value(CLOSE, scaled)
}
