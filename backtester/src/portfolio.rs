use chrono::{DateTime, Utc};
use common::{ExitReason, Position, Trade};

/// Cash, position, and trade-ledger accounting for a single run.
///
/// Holds at most one long position at a time; the engine drives all
/// transitions and owns the sequencing rules.
#[derive(Debug)]
pub struct Portfolio {
    initial_cash: f64,
    cash: f64,
    position: Option<Position>,
    trades: Vec<Trade>,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            initial_cash,
            cash: initial_cash,
            position: None,
            trades: Vec::new(),
        }
    }

    /// Current equity (cash + position value at `price`)
    pub fn equity(&self, price: f64) -> f64 {
        self.cash
            + self
                .position
                .as_ref()
                .map(|p| p.market_value(price))
                .unwrap_or(0.0)
    }

    /// Get available cash
    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Check if there's an open position
    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    /// Get current position reference
    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    /// Get all closed trades, in execution order
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Raise the trailing-stop reference to the latest close if it is higher.
    pub fn track_high(&mut self, close: f64) {
        if let Some(pos) = self.position.as_mut() {
            if close > pos.highest_price {
                pos.highest_price = close;
            }
        }
    }

    /// Price at which the trailing stop fires, if a position is open.
    pub fn trailing_stop_price(&self, stop_loss_pct: f64) -> Option<f64> {
        self.position
            .as_ref()
            .map(|p| p.highest_price * (1.0 - stop_loss_pct))
    }

    /// Open a long position. No-op if one is already open (no pyramiding)
    /// or if `shares` is zero.
    ///
    /// `signal_price` is the raw close the signal fired on; it seeds the
    /// trailing-stop high. `fill_price` is the slippage-adjusted price paid.
    pub fn open(
        &mut self,
        timestamp: DateTime<Utc>,
        shares: u64,
        fill_price: f64,
        signal_price: f64,
        commission: f64,
    ) {
        if self.position.is_some() || shares == 0 {
            return;
        }

        self.cash -= shares as f64 * fill_price + commission;
        self.position = Some(Position {
            shares,
            entry_price: fill_price,
            entry_date: timestamp,
            highest_price: signal_price,
        });
    }

    /// Close the open position at `fill_price` and record the trade.
    /// No-op when flat.
    pub fn close(
        &mut self,
        timestamp: DateTime<Utc>,
        fill_price: f64,
        commission: f64,
        reason: ExitReason,
    ) -> Option<Trade> {
        let position = self.position.take()?;
        let shares = position.shares as f64;

        self.cash += shares * fill_price - commission;

        let trade = Trade {
            entry_date: position.entry_date,
            exit_date: timestamp,
            entry_price: position.entry_price,
            exit_price: fill_price,
            shares: position.shares,
            pnl: (fill_price - position.entry_price) * shares,
            pnl_pct: (fill_price / position.entry_price - 1.0) * 100.0,
            exit_reason: reason,
        };

        self.trades.push(trade.clone());
        Some(trade)
    }

    /// Restore cash to the initial balance, drop the position, empty the ledger.
    pub fn reset(&mut self) {
        self.cash = self.initial_cash;
        self.position = None;
        self.trades.clear();
    }
}
