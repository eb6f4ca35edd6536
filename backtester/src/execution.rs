//! Deterministic order fills
//!
//! Turns a signal's reference close into the executed price and share count:
//! - Slippage is a fixed fractional adjustment, always against the trader
//! - Commission is a flat charge per executed order
//! - Orders fill whole shares only, sized to the available cash

use common::BacktestConfig;

/// Fill-price and share-sizing model shared by every order in a run
#[derive(Debug, Clone, Copy)]
pub struct FillModel {
    slippage: f64,
    commission: f64,
}

impl FillModel {
    pub fn new(slippage: f64, commission: f64) -> Self {
        Self {
            slippage,
            commission,
        }
    }

    pub fn from_config(config: &BacktestConfig) -> Self {
        Self::new(config.slippage, config.commission)
    }

    /// Flat commission per executed order
    pub fn commission(&self) -> f64 {
        self.commission
    }

    /// Price paid when buying: adjusted upward by slippage.
    pub fn buy_price(&self, signal_price: f64) -> f64 {
        signal_price * (1.0 + self.slippage)
    }

    /// Price received when selling: adjusted downward by slippage.
    pub fn sell_price(&self, signal_price: f64) -> f64 {
        signal_price * (1.0 - self.slippage)
    }

    /// Whole shares affordable at `fill_price` once the commission is set
    /// aside. Zero when nothing is affordable or the inputs are degenerate.
    pub fn affordable_shares(&self, cash: f64, fill_price: f64) -> u64 {
        let shares = ((cash - self.commission) / fill_price).floor();
        if shares.is_finite() && shares >= 1.0 {
            shares as u64
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_slippage_works_against_the_trader() {
        let fills = FillModel::new(0.001, 0.0);
        assert_relative_eq!(fills.buy_price(100.0), 100.1, epsilon = 1e-12);
        assert_relative_eq!(fills.sell_price(100.0), 99.9, epsilon = 1e-12);
        assert!(fills.buy_price(100.0) > 100.0);
        assert!(fills.sell_price(100.0) < 100.0);
    }

    #[test]
    fn test_zero_slippage_fills_at_signal_price() {
        let fills = FillModel::new(0.0, 0.0);
        assert_eq!(fills.buy_price(123.45), 123.45);
        assert_eq!(fills.sell_price(123.45), 123.45);
    }

    #[test]
    fn test_affordable_shares_floors_to_whole_shares() {
        let fills = FillModel::new(0.0, 0.0);
        assert_eq!(fills.affordable_shares(10000.0, 100.0), 100);
        assert_eq!(fills.affordable_shares(10000.0, 101.0), 99);
        assert_eq!(fills.affordable_shares(99.99, 100.0), 0);
    }

    #[test]
    fn test_commission_reserved_before_sizing() {
        let fills = FillModel::new(0.0, 50.0);
        assert_eq!(fills.affordable_shares(10000.0, 100.0), 99);
        // Commission exceeding cash leaves nothing to buy with
        assert_eq!(fills.affordable_shares(40.0, 100.0), 0);
    }

    #[test]
    fn test_degenerate_inputs_produce_zero_shares() {
        let fills = FillModel::new(0.0, 0.0);
        assert_eq!(fills.affordable_shares(10000.0, 0.0), 0);
        assert_eq!(fills.affordable_shares(f64::NAN, 100.0), 0);
        assert_eq!(fills.affordable_shares(-500.0, 100.0), 0);
    }
}
