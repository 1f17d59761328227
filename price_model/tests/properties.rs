use ndarray::Array2;
use price_model::{
    samples::{build_holdout, build_samples, training_cutoff},
    scaling::{ScaleError, fit_transform},
    series::{CLOSE, NormalizedSeries},
};
use proptest::prelude::*;

fn matrix(rows: usize, cols: usize) -> impl Strategy<Value = Array2<f64>> {
    prop::collection::vec(-1e3..1e3f64, rows * cols)
        .prop_map(move |v| Array2::from_shape_vec((rows, cols), v).unwrap())
}

fn series(rows: usize) -> NormalizedSeries {
    let raw = Array2::from_shape_fn((rows, 5), |(i, j)| (i * 5 + j) as f64);
    NormalizedSeries::from_raw(raw.view()).unwrap()
}

proptest! {
    #[test]
    fn scaling_round_trips(data in (1usize..20, 1usize..6).prop_flat_map(|(r, c)| matrix(r, c))) {
        let (scaled, fit) = fit_transform(data.view()).unwrap();
        let back = fit.inverse_transform(scaled.view()).unwrap();
        for (a, b) in data.iter().zip(back.iter()) {
            prop_assert!((a - b).abs() <= 1e-9, "{} vs {}", a, b);
        }
        prop_assert!(scaled.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn scaling_round_trips_or_reports_overflow(x in prop::num::f64::NORMAL) {
        let x = x.abs();
        let data = Array2::from_shape_vec((2, 1), vec![-x, x]).unwrap();

        match fit_transform(data.view()) {
            Ok((scaled, fit)) => {
                prop_assert!((2.0 * x).is_finite());
                prop_assert_eq!(fit.inverse_transform(scaled.view()).unwrap(), data.clone());
            }
            Err(err) => {
                prop_assert!((2.0 * x).is_infinite());
                prop_assert_eq!(err, ScaleError::RangeOverflow { column: 0 });
            }
        }
    }

    #[test]
    fn sample_count_law(rows in 2usize..120, window in 1usize..60, fraction in 0.01f64..=1.0) {
        prop_assume!(rows > window);
        let series = series(rows);
        let data = series.data();
        let cutoff = training_cutoff(rows, fraction);

        let samples = build_samples(&series, window, fraction).unwrap();
        let expected = cutoff.saturating_sub(window);
        prop_assert_eq!(samples.len(), expected);
        prop_assert_eq!(samples.inputs().dim(), (expected, window, 5));
        for sample in samples.iter() {
            prop_assert_eq!(sample.target, data[[sample.target_row, CLOSE]]);
            prop_assert_eq!(sample.input.row(window - 1), data.row(sample.target_row - 1));
        }

        let holdout = build_holdout(&series, window, fraction).unwrap();
        prop_assert_eq!(holdout.target_rows().end, rows);
    }
}
