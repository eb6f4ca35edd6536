/// Calculate RSI using Wilder's smoothing
///
/// # Arguments
/// * `values` - Slice of closing prices
/// * `period` - RSI lookback period
///
/// # Returns
/// Vector aligned with the input; NaN for the first `period` bars, 100 when
/// the average loss is zero, 0 when the average gain is zero
pub fn calculate_rsi(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];

    if period == 0 || n < period + 1 {
        return out;
    }

    let alpha = 1.0 / period as f64;

    // Simple averages over the first full window
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let delta = values[i] - values[i - 1];
        if delta > 0.0 {
            avg_gain += delta;
        } else {
            avg_loss += delta.abs();
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = rsi_value(avg_gain, avg_loss);

    // Wilder's smoothing for subsequent values
    for i in (period + 1)..n {
        let delta = values[i] - values[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        avg_gain = avg_gain * (1.0 - alpha) + gain * alpha;
        avg_loss = avg_loss * (1.0 - alpha) + loss * alpha;
        out[i] = rsi_value(avg_gain, avg_loss);
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_warmup_is_nan_then_bounded() {
        let values = vec![44.0, 44.25, 44.5, 43.75, 44.5, 44.25, 44.0, 43.5, 44.25, 44.5];
        let rsi = calculate_rsi(&values, 2);

        assert_eq!(rsi.len(), values.len());
        assert!(rsi[0].is_nan());
        assert!(rsi[1].is_nan());
        for val in &rsi[2..] {
            assert!(*val >= 0.0 && *val <= 100.0);
        }
    }

    #[test]
    fn test_rsi_known_values() {
        // period 2, dyadic prices keep everything exact
        let values = vec![10.0, 11.0, 10.0, 11.0];
        let rsi = calculate_rsi(&values, 2);

        assert_eq!(rsi[2], 50.0); // one gain, one loss of equal size
        assert_eq!(rsi[3], 75.0); // gains now outweigh losses 3:1
    }

    #[test]
    fn test_rsi_all_gains() {
        let values = vec![10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let rsi = calculate_rsi(&values, 2);
        assert_eq!(rsi[rsi.len() - 1], 100.0);
    }

    #[test]
    fn test_rsi_all_losses() {
        let values = vec![15.0, 14.0, 13.0, 12.0, 11.0, 10.0];
        let rsi = calculate_rsi(&values, 2);
        assert_eq!(rsi[rsi.len() - 1], 0.0);
    }

    #[test]
    fn test_rsi_too_little_data() {
        let rsi = calculate_rsi(&[10.0, 11.0], 14);
        assert!(rsi.iter().all(|v| v.is_nan()));
    }
}
