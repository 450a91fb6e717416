//! Windowed summaries of per-step series.
//!
//! Learning curves hold one point per step, often tens of thousands of them.
//! These helpers shrink a curve for console summaries without changing what
//! is written to reports.

/// Mean of each consecutive, non-overlapping window of `window` points.
///
/// A trailing partial window is averaged over the points it has. Returns an
/// empty vector if `window` is zero.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn window_means(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return vec![];
    }
    values
        .chunks(window)
        .map(|chunk| chunk.iter().sum::<f64>() / chunk.len() as f64)
        .collect()
}

/// Mean of the last `count` points, or `None` for an empty series.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn tail_mean(values: &[f64], count: usize) -> Option<f64> {
    let start = values.len().saturating_sub(count);
    let tail = &values[start..];
    if tail.is_empty() {
        return None;
    }
    Some(tail.iter().sum::<f64>() / tail.len() as f64)
}
