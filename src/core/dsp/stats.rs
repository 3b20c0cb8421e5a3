//! Numeric helpers shared by the detectors

/// Compute a centered moving average. Edge samples use a partial window.
///
/// Windows smaller than 2 and inputs shorter than the window are
/// returned unchanged.
pub fn moving_average(data: &[f64], window: usize) -> Vec<f64> {
    if window < 2 || data.len() < window {
        return data.to_vec();
    }

    let half = window / 2;
    (0..data.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half).min(data.len() - 1);
            let sum: f64 = data[lo..=hi].iter().sum();
            sum / (hi - lo + 1) as f64
        })
        .collect()
}

/// Linearly interpolated quantile, `q` in [0, 1].
pub fn quantile(data: &[f64], q: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;

    if lo + 1 < sorted.len() {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    } else {
        sorted[sorted.len() - 1]
    }
}

/// Discrete derivative of `values` with respect to `positions`.
///
/// Central differences in the interior, one-sided at the ends.
/// Positions must be strictly increasing.
pub fn gradient(values: &[f64], positions: &[f64]) -> Vec<f64> {
    let n = values.len();
    debug_assert_eq!(n, positions.len());

    if n < 2 {
        return vec![0.0; n];
    }

    let mut out = Vec::with_capacity(n);
    out.push((values[1] - values[0]) / (positions[1] - positions[0]));
    for i in 1..n - 1 {
        out.push((values[i + 1] - values[i - 1]) / (positions[i + 1] - positions[i - 1]));
    }
    out.push((values[n - 1] - values[n - 2]) / (positions[n - 1] - positions[n - 2]));
    out
}
