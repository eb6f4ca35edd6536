use common::{Bar, Signal};

use crate::indicators::calculate_rsi;

use super::Strategy;

/// Mean-reversion RSI strategy: buy oversold, sell overbought.
///
/// Runs without a trailing stop, so positions only leave on a sell signal or
/// at the end of the data.
#[derive(Debug, Clone)]
pub struct SimpleRsiStrategy {
    name: String,
    pub rsi_period: usize,
    pub buy_below: f64,
    pub sell_above: f64,
}

impl Default for SimpleRsiStrategy {
    fn default() -> Self {
        Self::new(14, 30.0, 70.0)
    }
}

impl SimpleRsiStrategy {
    pub fn new(rsi_period: usize, buy_below: f64, sell_above: f64) -> Self {
        Self {
            name: "Simple RSI".to_string(),
            rsi_period,
            buy_below,
            sell_above,
        }
    }
}

impl Strategy for SimpleRsiStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let rsi = calculate_rsi(&closes, self.rsi_period);

        // NaN warm-up values fail both comparisons and fall through to Hold
        rsi.iter()
            .map(|&value| {
                if value < self.buy_below {
                    Signal::Buy
                } else if value > self.sell_above {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            })
            .collect()
    }
}
