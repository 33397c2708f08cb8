//! Numeric helpers shared by the scoring and trend crates.
//!
//! Every 0-100 quantity in the engine passes through [`clamp_score`] before
//! it is stored or read by another computation.

/// Clamp a value into the 0-100 score range. NaN collapses to 0.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Round a score to the nearest integer after clamping it.
pub fn round_score(value: f64) -> u8 {
    clamp_score(value).round() as u8
}

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Pearson correlation coefficient of two equally long series.
///
/// Returns `None` when the series differ in length, have fewer than two
/// points, or either side has no variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs);
    let my = mean(ys);
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x < f64::EPSILON || var_y < f64::EPSILON {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Relative gap between two non-negative magnitudes (0 = identical, 1 = disjoint).
/// Two zero magnitudes count as identical.
pub fn relative_gap(a: f64, b: f64) -> f64 {
    let denom = a.abs().max(b.abs());
    if denom <= 0.0 {
        return 0.0;
    }
    ((a - b).abs() / denom).min(1.0)
}

/// Case-insensitive substring test in either direction.
pub fn texts_overlap(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}
