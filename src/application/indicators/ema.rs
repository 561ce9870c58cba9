/// EMA values from the first fully seeded bar onwards.
///
/// The seed is the simple average of the first `period` values; each later
/// value uses `k = 2 / (period + 1)`. Element `i` of the result lines up with
/// `values[i + period - 1]`. `None` when `values.len() < period`.
pub fn ema_series(values: &[f64], period: usize) -> Option<Vec<f64>> {
    if period == 0 || values.len() < period {
        return None;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(seed);

    let mut prev = seed;
    for value in &values[period..] {
        prev = (value - prev) * k + prev;
        out.push(prev);
    }
    Some(out)
}

/// Latest EMA value.
pub fn ema(values: &[f64], period: usize) -> Option<f64> {
    ema_series(values, period)?.last().copied()
}
