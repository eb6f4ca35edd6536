use common::{Bar, BacktestError, BacktestMetrics, EquityPoint, Result, Trade};

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const DAYS_PER_YEAR: f64 = 365.25;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Floor for gross losses when a run has no losing trades
const MIN_GROSS_LOSS: f64 = 0.001;

/// Calculates performance metrics from an equity curve and trade ledger
#[derive(Debug, Clone, Copy)]
pub struct MetricsCalculator {
    risk_free_rate: f64,
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_RISK_FREE_RATE)
    }
}

impl MetricsCalculator {
    /// `risk_free_rate` is annual, e.g. 0.02 for 2%.
    pub fn new(risk_free_rate: f64) -> Self {
        Self { risk_free_rate }
    }

    /// Calculate all performance metrics for a completed run.
    ///
    /// The benchmark, when given, is clipped to the strategy's date range and
    /// rescaled to its starting equity before its return is measured.
    pub fn calculate(
        &self,
        equity_curve: &[EquityPoint],
        trades: &[Trade],
        benchmark: Option<&[Bar]>,
    ) -> Result<BacktestMetrics> {
        if equity_curve.is_empty() {
            return Err(BacktestError::EmptyEquityCurve);
        }
        let first = &equity_curve[0];
        let last = &equity_curve[equity_curve.len() - 1];

        let returns = daily_returns(equity_curve);
        let total = total_return(equity_curve);
        let annual = cagr(equity_curve);
        let (max_dd, max_dd_duration) = max_drawdown(equity_curve);
        let stats = trade_stats(trades);

        let (benchmark_return, excess_return) =
            match benchmark.and_then(|bars| rescaled_benchmark(bars, equity_curve)) {
                Some(curve) => {
                    let bench = total_return(&curve);
                    (bench, total - bench)
                }
                None => (0.0, 0.0),
            };

        Ok(BacktestMetrics {
            total_return: total,
            annual_return: annual,
            benchmark_return,
            excess_return,
            volatility: volatility(&returns),
            max_drawdown: max_dd,
            max_drawdown_duration: max_dd_duration,
            sharpe_ratio: self.sharpe_ratio(&returns),
            sortino_ratio: self.sortino_ratio(&returns),
            calmar_ratio: calmar_ratio(annual, max_dd),
            total_trades: trades.len(),
            win_rate: stats.win_rate,
            avg_win: stats.avg_win,
            avg_loss: stats.avg_loss,
            profit_factor: stats.profit_factor,
            avg_trade: stats.avg_trade,
            start_date: first.timestamp.date_naive(),
            end_date: last.timestamp.date_naive(),
            trading_days: equity_curve.len(),
        })
    }

    /// Annualized excess return over annualized volatility; 0 when volatility is 0.
    fn sharpe_ratio(&self, returns: &[f64]) -> f64 {
        let annual_vol = stddev(returns) * TRADING_DAYS_PER_YEAR.sqrt();
        if annual_vol == 0.0 {
            return 0.0;
        }
        (mean(returns) * TRADING_DAYS_PER_YEAR - self.risk_free_rate) / annual_vol
    }

    /// Same numerator as Sharpe over downside deviation only. No negative
    /// returns at all means no downside risk: +infinity.
    fn sortino_ratio(&self, returns: &[f64]) -> f64 {
        let negative: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
        if negative.is_empty() {
            return f64::INFINITY;
        }
        let downside = stddev(&negative) * TRADING_DAYS_PER_YEAR.sqrt();
        if downside == 0.0 {
            return 0.0;
        }
        (mean(returns) * TRADING_DAYS_PER_YEAR - self.risk_free_rate) / downside
    }
}

/// Bar-over-bar fractional change; the first bar has no prior and is dropped.
pub fn daily_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            let prev = w[0].equity;
            if prev != 0.0 {
                (w[1].equity - prev) / prev
            } else {
                0.0
            }
        })
        .collect()
}

/// Percent return from the first to the last point of a curve.
pub fn total_return(curve: &[EquityPoint]) -> f64 {
    match (curve.first(), curve.last()) {
        (Some(first), Some(last)) if first.equity != 0.0 => {
            (last.equity / first.equity - 1.0) * 100.0
        }
        _ => 0.0,
    }
}

/// Compound annual growth rate in percent, using calendar days elapsed
/// between the first and last equity points. 0 when no time has elapsed.
pub fn cagr(curve: &[EquityPoint]) -> f64 {
    let (first, last) = match (curve.first(), curve.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return 0.0,
    };
    let elapsed_days = (last.timestamp - first.timestamp).num_days();
    if elapsed_days <= 0 || first.equity <= 0.0 {
        return 0.0;
    }
    let growth = last.equity / first.equity;
    if growth <= 0.0 {
        return 0.0;
    }
    (growth.powf(DAYS_PER_YEAR / elapsed_days as f64) - 1.0) * 100.0
}

/// Annualized standard deviation of daily returns, in percent.
pub fn volatility(returns: &[f64]) -> f64 {
    stddev(returns) * TRADING_DAYS_PER_YEAR.sqrt() * 100.0
}

/// Deepest peak-to-trough decline in percent (always ≤ 0) and the longest
/// contiguous run of bars spent strictly below a prior equity peak.
pub fn max_drawdown(curve: &[EquityPoint]) -> (f64, usize) {
    if curve.is_empty() {
        return (0.0, 0);
    }

    let mut peak = curve[0].equity;
    let mut max_dd = 0.0;
    let mut longest = 0usize;
    let mut current = 0usize;

    for point in curve {
        if point.equity > peak {
            peak = point.equity;
        }
        if peak > 0.0 {
            let dd = (point.equity - peak) / peak * 100.0;
            if dd < max_dd {
                max_dd = dd;
            }
        }
        if point.equity < peak {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    (max_dd, longest)
}

/// CAGR over drawdown magnitude, both taken as decimals; 0 with no drawdown.
pub fn calmar_ratio(annual_return_pct: f64, max_drawdown_pct: f64) -> f64 {
    let dd = (max_drawdown_pct / 100.0).abs();
    if dd == 0.0 {
        return 0.0;
    }
    (annual_return_pct / 100.0) / dd
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1 denominator); 0 with fewer than two samples.
fn stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

#[derive(Debug, Default)]
struct TradeStats {
    win_rate: f64,
    avg_win: f64,
    avg_loss: f64,
    profit_factor: f64,
    avg_trade: f64,
}

fn trade_stats(trades: &[Trade]) -> TradeStats {
    if trades.is_empty() {
        return TradeStats::default();
    }

    let wins: Vec<f64> = trades
        .iter()
        .filter(|t| t.is_win())
        .map(|t| t.pnl_pct)
        .collect();
    let losses: Vec<f64> = trades
        .iter()
        .filter(|t| !t.is_win())
        .map(|t| t.pnl_pct)
        .collect();

    let gross_profit: f64 = wins.iter().sum();
    // A run with no losers still needs a non-zero denominator
    let gross_loss = if losses.is_empty() {
        MIN_GROSS_LOSS
    } else {
        losses.iter().sum::<f64>().abs()
    };

    TradeStats {
        win_rate: wins.len() as f64 / trades.len() as f64 * 100.0,
        avg_win: mean(&wins),
        avg_loss: mean(&losses),
        profit_factor: if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else {
            0.0
        },
        avg_trade: trades.iter().map(|t| t.pnl_pct).sum::<f64>() / trades.len() as f64,
    }
}

/// Benchmark closes clipped to the strategy's window, rescaled so the curve
/// starts at the strategy's first equity value. None when nothing overlaps.
fn rescaled_benchmark(bars: &[Bar], equity_curve: &[EquityPoint]) -> Option<Vec<EquityPoint>> {
    let first = equity_curve.first()?;
    let last = equity_curve.last()?;

    let clipped: Vec<&Bar> = bars
        .iter()
        .filter(|b| b.timestamp >= first.timestamp && b.timestamp <= last.timestamp)
        .collect();

    let base = clipped.first()?.close;
    if base <= 0.0 {
        return None;
    }

    let scale = first.equity / base;
    Some(
        clipped
            .iter()
            .map(|b| EquityPoint::new(b.timestamp, b.close * scale))
            .collect(),
    )
}
