//! Trailing-window reductions.
//!
//! Every function yields one value per input index. At the start of the
//! series the window shrinks to the points available, so no index is left
//! undefined for lack of history.

fn window(values: &[f64], i: usize, size: usize) -> &[f64] {
    let start = (i + 1).saturating_sub(size);
    &values[start..=i]
}

pub fn rolling_mean(values: &[f64], size: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            let w = window(values, i, size);
            w.iter().sum::<f64>() / w.len() as f64
        })
        .collect()
}

/// Sample standard deviation (divisor n-1) over the trailing window.
///
/// `None` when the window holds fewer than two points or every point in it
/// is equal.
pub fn rolling_sample_std(values: &[f64], size: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            let w = window(values, i, size);
            if w.len() < 2 || w.iter().all(|&v| v == w[0]) {
                return None;
            }
            let mean = w.iter().sum::<f64>() / w.len() as f64;
            let variance =
                w.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (w.len() - 1) as f64;
            Some(variance.sqrt())
        })
        .collect()
}

pub fn rolling_max(values: &[f64], size: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            window(values, i, size)
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .collect()
}

pub fn rolling_min(values: &[f64], size: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            window(values, i, size)
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min)
        })
        .collect()
}
