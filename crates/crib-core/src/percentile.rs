//! Order statistics over numeric series.

/// Returns the `p`-quantile of `values` (`p` in `[0, 1]`) by linear
/// interpolation between the two nearest order statistics.
///
/// Uses the `h = (n - 1) * p` definition. Returns `None` for an empty input.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let fraction = h - lo as f64;
    Some((sorted[hi] - sorted[lo]).mul_add(fraction, sorted[lo]))
}

/// Largest value; NaN entries are skipped.
#[must_use]
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Rounds to the nearest integer, halves towards positive infinity.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
