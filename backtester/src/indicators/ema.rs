/// Calculate Exponential Moving Average
///
/// # Arguments
/// * `values` - Slice of prices
/// * `period` - EMA period
///
/// # Returns
/// Vector aligned with the input, seeded at the first value, so an EMA is
/// defined from the first bar onward
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    if n == 0 || period == 0 {
        return vec![f64::NAN; n];
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = vec![0.0; n];
    out[0] = values[0];

    for i in 1..n {
        out[i] = alpha * values[i] + (1.0 - alpha) * out[i - 1];
    }

    out
}
