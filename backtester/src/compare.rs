use rayon::prelude::*;
use serde::Serialize;

use common::{BacktestConfig, Bar, Result};

use crate::engine::Backtester;
use crate::strategies::Strategy;

/// One row of a side-by-side strategy comparison
#[derive(Debug, Clone, Serialize)]
pub struct StrategyComparison {
    pub strategy: String,
    pub total_return: f64,
    pub annual_return: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub total_trades: usize,
    pub final_equity: f64,
}

/// Run every strategy over the same bars and collect summary rows.
///
/// Strategies run in parallel with one engine each; rows come back in input
/// order. A failure in any single run fails the whole comparison.
pub fn compare_strategies(
    strategies: &[Box<dyn Strategy>],
    bars: &[Bar],
    benchmark: Option<&[Bar]>,
    config: &BacktestConfig,
) -> Result<Vec<StrategyComparison>> {
    strategies
        .par_iter()
        .map(|strategy| {
            let mut backtester = Backtester::new(config.clone());
            let result = backtester.run(strategy.as_ref(), bars, benchmark)?;
            Ok(StrategyComparison {
                strategy: result.strategy,
                total_return: result.metrics.total_return,
                annual_return: result.metrics.annual_return,
                sharpe_ratio: result.metrics.sharpe_ratio,
                sortino_ratio: result.metrics.sortino_ratio,
                max_drawdown: result.metrics.max_drawdown,
                win_rate: result.metrics.win_rate,
                total_trades: result.metrics.total_trades,
                final_equity: result.final_equity,
            })
        })
        .collect()
}
