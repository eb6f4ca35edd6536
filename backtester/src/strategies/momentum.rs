use common::{Bar, Signal};

use crate::indicators::{calculate_ema, calculate_rsi, calculate_sma, crossover, crossunder};

use super::Strategy;

/// Trend-following moving-average crossover strategy.
///
/// Buys when the fast average crosses above the slow average while RSI sits
/// inside a sane band and price holds above a long trend filter. Sells on the
/// reverse crossover or when RSI runs overbought. Open positions carry a
/// trailing stop.
#[derive(Debug, Clone)]
pub struct MomentumStrategy {
    name: String,
    pub fast_period: usize,
    pub slow_period: usize,
    pub trend_period: usize,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub rsi_exit: f64,
    pub use_ema: bool,
    pub stop_loss_pct: f64,
}

impl Default for MomentumStrategy {
    fn default() -> Self {
        Self {
            name: "Momentum".to_string(),
            fast_period: 10,
            slow_period: 30,
            trend_period: 50,
            rsi_period: 14,
            rsi_oversold: 40.0,
            rsi_overbought: 70.0,
            rsi_exit: 80.0,
            use_ema: true,
            stop_loss_pct: 0.08,
        }
    }
}

impl MomentumStrategy {
    /// Short EMA windows, wide RSI band, tight stop
    pub fn aggressive() -> Self {
        Self {
            name: "Aggressive Momentum".to_string(),
            fast_period: 5,
            slow_period: 15,
            trend_period: 20,
            rsi_period: 10,
            rsi_oversold: 35.0,
            rsi_overbought: 65.0,
            rsi_exit: 75.0,
            use_ema: true,
            stop_loss_pct: 0.06,
        }
    }

    /// Long SMA windows, narrow RSI band, loose stop
    pub fn conservative() -> Self {
        Self {
            name: "Conservative Momentum".to_string(),
            fast_period: 20,
            slow_period: 50,
            trend_period: 100,
            rsi_period: 14,
            rsi_oversold: 45.0,
            rsi_overbought: 65.0,
            rsi_exit: 75.0,
            use_ema: false,
            stop_loss_pct: 0.10,
        }
    }

    pub fn with_periods(mut self, fast: usize, slow: usize, trend: usize) -> Self {
        self.fast_period = fast;
        self.slow_period = slow;
        self.trend_period = trend;
        self
    }

    pub fn with_stop_loss(mut self, stop_loss_pct: f64) -> Self {
        self.stop_loss_pct = stop_loss_pct;
        self
    }
}

impl Strategy for MomentumStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        let (fast, slow) = if self.use_ema {
            (
                calculate_ema(&closes, self.fast_period),
                calculate_ema(&closes, self.slow_period),
            )
        } else {
            (
                calculate_sma(&closes, self.fast_period),
                calculate_sma(&closes, self.slow_period),
            )
        };
        let trend = calculate_sma(&closes, self.trend_period);
        let rsi = calculate_rsi(&closes, self.rsi_period);

        let cross_up = crossover(&fast, &slow);
        let cross_down = crossunder(&fast, &slow);

        (0..bars.len())
            .map(|i| {
                // Exit condition wins when both fire on the same bar
                if cross_down[i] || rsi[i] > self.rsi_exit {
                    Signal::Sell
                } else if cross_up[i]
                    && rsi[i] >= self.rsi_oversold
                    && rsi[i] <= self.rsi_overbought
                    && closes[i] > trend[i]
                {
                    Signal::Buy
                } else {
                    Signal::Hold
                }
            })
            .collect()
    }

    fn use_trailing_stop(&self) -> bool {
        true
    }

    fn stop_loss_pct(&self) -> f64 {
        self.stop_loss_pct
    }
}
