use common::{
    BacktestConfig, BacktestError, BacktestResult, Bar, EquityPoint, ExitReason, Result, Signal,
};

use crate::execution::FillModel;
use crate::metrics::MetricsCalculator;
use crate::portfolio::Portfolio;
use crate::strategies::Strategy;

/// Day-by-day simulation engine
///
/// Owns cash/position state for the lifetime of one run. State is reset at
/// the start of every run, so an instance can be reused sequentially;
/// concurrent runs need independent instances.
pub struct Backtester {
    config: BacktestConfig,
    fills: FillModel,
    portfolio: Portfolio,
    equity_curve: Vec<EquityPoint>,
}

impl Backtester {
    pub fn new(config: BacktestConfig) -> Self {
        let fills = FillModel::from_config(&config);
        let portfolio = Portfolio::new(config.initial_cash);
        Self {
            config,
            fills,
            portfolio,
            equity_curve: Vec::new(),
        }
    }

    /// Simulate `strategy` over `bars`, optionally measuring excess return
    /// against a benchmark bar sequence.
    ///
    /// Signals execute at the close of the bar they fire on. A trailing
    /// stop, when the strategy requests one, is checked before the day's
    /// signal and pre-empts it. Exactly one equity point is recorded per
    /// bar; a position still open after the last bar is closed at its close.
    pub fn run(
        &mut self,
        strategy: &dyn Strategy,
        bars: &[Bar],
        benchmark: Option<&[Bar]>,
    ) -> Result<BacktestResult> {
        self.config.validate()?;
        validate_bars(bars)?;

        let use_stop = strategy.use_trailing_stop();
        let stop_loss_pct = strategy.stop_loss_pct();
        if use_stop && !(0.0..1.0).contains(&stop_loss_pct) {
            return Err(BacktestError::InvalidParameter(format!(
                "stop_loss_pct must be in [0, 1), got {stop_loss_pct}"
            )));
        }

        let signals = strategy.generate_signals(bars);
        if signals.len() != bars.len() {
            return Err(BacktestError::SignalLengthMismatch {
                bars: bars.len(),
                signals: signals.len(),
            });
        }

        self.reset();
        self.equity_curve.reserve(bars.len());

        for (bar, signal) in bars.iter().zip(&signals) {
            let price = bar.close;

            self.portfolio.track_high(price);

            if use_stop {
                if let Some(stop_price) = self.portfolio.trailing_stop_price(stop_loss_pct) {
                    if price <= stop_price {
                        // Stop-loss pre-empts the day's signal
                        self.sell(bar, ExitReason::StopLoss);
                        self.record_equity(bar);
                        continue;
                    }
                }
            }

            match signal {
                Signal::Buy if !self.portfolio.has_position() => self.buy(bar),
                Signal::Sell if self.portfolio.has_position() => {
                    self.sell(bar, ExitReason::Signal)
                }
                _ => {}
            }

            self.record_equity(bar);
        }

        // Close anything still open at the final bar's close
        if self.portfolio.has_position() {
            let last_bar = &bars[bars.len() - 1];
            self.sell(last_bar, ExitReason::EndOfData);
        }

        let metrics = MetricsCalculator::new(self.config.risk_free_rate).calculate(
            &self.equity_curve,
            self.portfolio.trades(),
            benchmark,
        )?;

        Ok(BacktestResult {
            strategy: strategy.name().to_string(),
            metrics,
            equity_curve: self.equity_curve.clone(),
            trades: self.portfolio.trades().to_vec(),
            signals,
            initial_cash: self.config.initial_cash,
            final_equity: self.portfolio.cash(),
        })
    }

    /// Restore the engine to its initial conditions.
    pub fn reset(&mut self) {
        self.portfolio.reset();
        self.equity_curve.clear();
    }

    fn buy(&mut self, bar: &Bar) {
        let fill_price = self.fills.buy_price(bar.close);
        let shares = self
            .fills
            .affordable_shares(self.portfolio.cash(), fill_price);
        if shares == 0 {
            // Cannot afford a single share; stay flat
            return;
        }
        self.portfolio.open(
            bar.timestamp,
            shares,
            fill_price,
            bar.close,
            self.fills.commission(),
        );
    }

    fn sell(&mut self, bar: &Bar, reason: ExitReason) {
        let fill_price = self.fills.sell_price(bar.close);
        self.portfolio
            .close(bar.timestamp, fill_price, self.fills.commission(), reason);
    }

    fn record_equity(&mut self, bar: &Bar) {
        self.equity_curve
            .push(EquityPoint::new(bar.timestamp, self.portfolio.equity(bar.close)));
    }
}

fn validate_bars(bars: &[Bar]) -> Result<()> {
    if bars.is_empty() {
        return Err(BacktestError::EmptyBars);
    }
    for i in 1..bars.len() {
        if bars[i].timestamp <= bars[i - 1].timestamp {
            return Err(BacktestError::UnorderedBars { index: i });
        }
    }
    Ok(())
}
