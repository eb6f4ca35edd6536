pub mod cross;
pub mod ema;
pub mod rsi;
pub mod sma;

pub use cross::{crossover, crossunder};
pub use ema::calculate_ema;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
