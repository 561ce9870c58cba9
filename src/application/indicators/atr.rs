/// Wilder ATR. True range of bar `i` uses the close of bar `i - 1`, so the
/// first bar only supplies a previous close. Seed is the simple average of
/// the first `period` true ranges. `None` with fewer than `period + 1` bars
/// or mismatched input lengths.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<f64> {
    let n = closes.len();
    if period == 0 || highs.len() != n || lows.len() != n || n < period + 1 {
        return None;
    }

    let true_ranges: Vec<f64> = (1..n)
        .map(|i| {
            let prev_close = closes[i - 1];
            (highs[i] - lows[i])
                .max((highs[i] - prev_close).abs())
                .max((lows[i] - prev_close).abs())
        })
        .collect();

    let p = period as f64;
    let mut value = true_ranges[..period].iter().sum::<f64>() / p;
    for tr in &true_ranges[period..] {
        value = (value * (p - 1.0) + tr) / p;
    }
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_range() {
        let closes = vec![100.0; 30];
        let highs = vec![101.0; 30];
        let lows = vec![99.0; 30];
        let value = atr(&highs, &lows, &closes, 14).unwrap();
        assert!((value - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_gap_counts_in_true_range() {
        // Bar 2 gaps up: high-low is 1 but |high - prev close| is 11
        let highs = [10.5, 10.5, 21.0];
        let lows = [9.5, 9.5, 20.0];
        let closes = [10.0, 10.0, 20.5];
        let value = atr(&highs, &lows, &closes, 2).unwrap();
        // TRs: 1.0, 11.0 -> seed 6.0
        assert!((value - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_volatility_spike_moves_atr() {
        let mut highs = vec![101.0; 20];
        let mut lows = vec![99.0; 20];
        let closes = vec![100.0; 21];
        highs.push(110.0);
        lows.push(90.0);
        // (2.0 * 13 + 20) / 14
        let value = atr(&highs, &lows, &closes, 14).unwrap();
        assert!((value - 46.0 / 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_insufficient_history() {
        let v = vec![1.0; 14];
        assert!(atr(&v, &v, &v, 14).is_none());
        let v = vec![1.0; 15];
        assert!(atr(&v, &v, &v, 14).is_some());
        assert!(atr(&[1.0, 2.0], &[1.0], &[1.0, 2.0], 1).is_none());
    }
}
