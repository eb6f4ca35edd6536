pub mod compare;
pub mod data;
pub mod engine;
pub mod execution;
pub mod indicators;
pub mod metrics;
pub mod portfolio;
pub mod strategies;

pub use compare::{compare_strategies, StrategyComparison};
pub use data::{generate_bars, generate_trending_bars, load_file};
pub use engine::Backtester;
pub use execution::FillModel;
pub use metrics::MetricsCalculator;
pub use portfolio::Portfolio;
pub use strategies::{MomentumStrategy, SimpleRsiStrategy, Strategy};

// Re-export common types
pub use common::{
    BacktestConfig, BacktestError, BacktestMetrics, BacktestResult, Bar, EquityPoint, ExitReason,
    Position, Result, Signal, Trade,
};
