use serde::{Deserialize, Serialize};

use crate::error::{BacktestError, Result};

/// Simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Starting cash balance
    pub initial_cash: f64,
    /// Flat commission charged per executed order
    pub commission: f64,
    /// Fractional price adjustment applied against the trader on every fill
    pub slippage: f64,
    /// Annual risk-free rate used for Sharpe and Sortino
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_cash: 10_000.0,
            commission: 0.0,
            slippage: 0.001,
            risk_free_rate: 0.02,
        }
    }
}

impl BacktestConfig {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            initial_cash,
            ..Default::default()
        }
    }

    pub fn with_capital(mut self, initial_cash: f64) -> Self {
        self.initial_cash = initial_cash;
        self
    }

    pub fn with_commission(mut self, commission: f64) -> Self {
        self.commission = commission;
        self
    }

    pub fn with_slippage(mut self, slippage: f64) -> Self {
        self.slippage = slippage;
        self
    }

    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    /// Rejects parameter combinations the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_cash.is_finite() || self.initial_cash <= 0.0 {
            return Err(BacktestError::InvalidParameter(format!(
                "initial_cash must be positive, got {}",
                self.initial_cash
            )));
        }
        if !self.commission.is_finite() || self.commission < 0.0 {
            return Err(BacktestError::InvalidParameter(format!(
                "commission must be non-negative, got {}",
                self.commission
            )));
        }
        if !self.slippage.is_finite() || self.slippage < 0.0 {
            return Err(BacktestError::InvalidParameter(format!(
                "slippage must be non-negative, got {}",
                self.slippage
            )));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(BacktestError::InvalidParameter(
                "risk_free_rate must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
