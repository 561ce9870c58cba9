/// Stand-in for a zero average loss so that an all-gains series
/// saturates near 100 instead of dividing by zero.
const MIN_AVG_LOSS: f64 = 1e-10;

/// Wilder RSI. Seeds average gain/loss over the first `period` deltas, then
/// smooths `avg = (avg * (period - 1) + current) / period`.
/// `None` unless `values.len() > period`.
pub fn rsi(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() <= period {
        return None;
    }

    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let p = period as f64;

    let (gain_sum, loss_sum) = deltas[..period]
        .iter()
        .fold((0.0, 0.0), |(g, l), d| (g + d.max(0.0), l + (-d).max(0.0)));
    let mut avg_gain = gain_sum / p;
    let mut avg_loss = loss_sum / p;

    for delta in &deltas[period..] {
        avg_gain = (avg_gain * (p - 1.0) + delta.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-delta).max(0.0)) / p;
    }

    if avg_loss == 0.0 {
        avg_loss = MIN_AVG_LOSS;
    }
    let rs = avg_gain / avg_loss;
    let value = 100.0 - 100.0 / (1.0 + rs);
    value.is_finite().then_some(value)
}
