pub mod momentum;
pub mod simple_rsi;

pub use momentum::MomentumStrategy;
pub use simple_rsi::SimpleRsiStrategy;

use common::{Bar, Signal};

/// Default trailing-stop fraction for strategies that request protection
pub const DEFAULT_STOP_LOSS_PCT: f64 = 0.08;

/// A trading rule the engine can simulate.
///
/// Implementations decide each bar's action from history up to and including
/// that bar. The engine validates nothing about how the signals were derived
/// beyond their 1:1 alignment with the bar sequence.
pub trait Strategy: Send + Sync {
    /// Display name used in reports and comparisons
    fn name(&self) -> &str;

    /// One action per input bar, same order, same length
    fn generate_signals(&self, bars: &[Bar]) -> Vec<Signal>;

    /// Whether the engine should protect positions with a trailing stop
    fn use_trailing_stop(&self) -> bool {
        false
    }

    /// Trailing-stop distance below the highest close since entry, in [0, 1)
    fn stop_loss_pct(&self) -> f64 {
        DEFAULT_STOP_LOSS_PCT
    }
}
