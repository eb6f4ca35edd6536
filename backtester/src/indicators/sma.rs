/// Calculate Simple Moving Average
///
/// # Arguments
/// * `values` - Slice of prices
/// * `period` - SMA period
///
/// # Returns
/// Vector aligned with the input, NaN until a full window is available
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];

    if period == 0 || n < period {
        return out;
    }

    // Initial window
    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = sum / period as f64;

    // Sliding window for subsequent values
    for i in period..n {
        sum = sum - values[i - period] + values[i];
        out[i] = sum / period as f64;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_basic() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let sma = calculate_sma(&values, 3);

        assert_eq!(sma.len(), values.len());
        assert!(sma[0].is_nan());
        assert!(sma[1].is_nan());
        assert_eq!(sma[2], 2.0); // (1+2+3)/3
        assert_eq!(sma[3], 3.0); // (2+3+4)/3
        assert_eq!(sma[9], 9.0); // (8+9+10)/3
    }

    #[test]
    fn test_sma_period_larger_than_data() {
        let values = vec![1.0, 2.0, 3.0];
        let sma = calculate_sma(&values, 5);

        assert_eq!(sma.len(), 3);
        assert!(sma.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_sma_nan_comparisons_are_false() {
        // Warm-up values must never satisfy a threshold comparison
        let sma = calculate_sma(&[1.0, 2.0, 3.0], 3);
        assert!(!(sma[0] > 0.0));
        assert!(!(sma[0] < 0.0));
        assert_eq!(sma[2], 2.0);
    }
}
