//! Empirical quantiles (R-7 definition, linear interpolation).

/// Quantile of already-sorted data.
///
/// # Panics
///
/// Panics if `sorted` is empty or `p` is outside [0, 1].
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty(), "Cannot compute quantile of empty slice");
    assert!(
        (0.0..=1.0).contains(&p),
        "Quantile probability must be in [0, 1]"
    );

    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let frac = h - h.floor();

    if lo >= n - 1 {
        sorted[n - 1]
    } else if frac == 0.0 {
        sorted[lo]
    } else {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    }
}

/// Several quantiles at once, sorting a copy of `data` a single time.
///
/// # Panics
///
/// Panics if `data` is empty or any probability is outside [0, 1].
pub fn compute_quantiles(data: &[f64], probs: &[f64]) -> Vec<f64> {
    assert!(!data.is_empty(), "Cannot compute quantile of empty slice");
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));
    probs.iter().map(|&p| quantile_sorted(&sorted, p)).collect()
}
