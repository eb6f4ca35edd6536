//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Hold-only runs never move equity
//! 2. Round trips never overlap and all close by the last bar
//! 3. Cash accounting ties out against the trade ledger
//! 4. Buy-and-hold matches the whole-share arithmetic
//! 5. Slippage always works against the trader
//! 6. Drawdown is non-positive with a bounded duration
//! 7. Reruns are deterministic

use backtester::{BacktestConfig, Backtester, Bar, EquityPoint, Signal};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Bar::new(
                start + Duration::days(i as i64),
                close,
                close,
                close,
                close,
                1_000_000,
            )
        })
        .collect()
}

fn make_curve(values: &[f64]) -> Vec<EquityPoint> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| EquityPoint::new(start + Duration::days(i as i64), v))
        .collect()
}

struct FixedSignals(Vec<Signal>);

impl backtester::Strategy for FixedSignals {
    fn name(&self) -> &str {
        "Fixed"
    }

    fn generate_signals(&self, _bars: &[Bar]) -> Vec<Signal> {
        self.0.clone()
    }
}

// ---- proptest strategies -------------------------------------------------

fn arb_signal() -> impl Strategy<Value = Signal> {
    prop_oneof![
        Just(Signal::Buy),
        Just(Signal::Sell),
        Just(Signal::Hold),
    ]
}

/// Positive close prices with a matching-length signal vector
fn arb_market() -> impl Strategy<Value = (Vec<f64>, Vec<Signal>)> {
    prop::collection::vec(10.0..500.0_f64, 2..60).prop_flat_map(|closes| {
        let len = closes.len();
        (Just(closes), prop::collection::vec(arb_signal(), len))
    })
}

// ---- 1. Hold-only runs ---------------------------------------------------

proptest! {
    /// A strategy that never signals leaves equity pinned at initial cash.
    #[test]
    fn hold_only_keeps_equity_at_initial_cash(
        closes in prop::collection::vec(10.0..500.0_f64, 2..60),
    ) {
        let bars = make_bars(&closes);
        let strategy = FixedSignals(vec![Signal::Hold; bars.len()]);
        let mut engine = Backtester::new(BacktestConfig::default());

        let result = engine.run(&strategy, &bars, None).unwrap();

        prop_assert!(result.trades.is_empty());
        prop_assert!(result.equity_curve.iter().all(|p| p.equity == 10_000.0));
        prop_assert_eq!(result.final_equity, 10_000.0);
    }
}

// ---- 2. Single position, no overlap --------------------------------------

proptest! {
    /// Whatever the signals, trades are chronological round trips that never
    /// overlap, and nothing stays open past the final bar.
    #[test]
    fn round_trips_never_overlap((closes, signals) in arb_market()) {
        let bars = make_bars(&closes);
        let strategy = FixedSignals(signals);
        let mut engine = Backtester::new(BacktestConfig::default());

        let result = engine.run(&strategy, &bars, None).unwrap();

        let last_ts = bars[bars.len() - 1].timestamp;
        for trade in &result.trades {
            prop_assert!(trade.entry_date <= trade.exit_date);
            prop_assert!(trade.exit_date <= last_ts);
            prop_assert!(trade.shares > 0);
        }
        for pair in result.trades.windows(2) {
            prop_assert!(pair[0].exit_date <= pair[1].entry_date);
        }
        prop_assert_eq!(result.equity_curve.len(), bars.len());
    }
}

// ---- 3. Cash accounting --------------------------------------------------

proptest! {
    /// Final equity equals initial cash plus ledger pnl minus two commission
    /// charges per round trip, for any signals and friction settings.
    #[test]
    fn cash_ties_out_against_trade_ledger(
        (closes, signals) in arb_market(),
        slippage in 0.0..0.01_f64,
        commission in 0.0..5.0_f64,
    ) {
        let bars = make_bars(&closes);
        let strategy = FixedSignals(signals);
        let config = BacktestConfig::default()
            .with_slippage(slippage)
            .with_commission(commission);
        let mut engine = Backtester::new(config);

        let result = engine.run(&strategy, &bars, None).unwrap();

        let pnl_sum: f64 = result.trades.iter().map(|t| t.pnl).sum();
        let fees = 2.0 * commission * result.trades.len() as f64;
        let expected = 10_000.0 + pnl_sum - fees;
        prop_assert!(
            (result.final_equity - expected).abs() < 1e-6 * expected.abs().max(1.0),
            "final equity {} != expected {}",
            result.final_equity,
            expected
        );
    }
}

// ---- 4. Buy-and-hold golden formula --------------------------------------

proptest! {
    /// Buying the first bar and holding to the end is whole-share arithmetic:
    /// leftover cash plus shares marked at the last close.
    #[test]
    fn buy_and_hold_matches_whole_share_arithmetic(
        closes in prop::collection::vec(10.0..500.0_f64, 2..60),
    ) {
        let bars = make_bars(&closes);
        let mut signals = vec![Signal::Hold; bars.len()];
        signals[0] = Signal::Buy;
        let strategy = FixedSignals(signals);
        let mut engine = Backtester::new(BacktestConfig::default().with_slippage(0.0));

        let result = engine.run(&strategy, &bars, None).unwrap();

        let shares = (10_000.0 / closes[0]).floor();
        let leftover = 10_000.0 - shares * closes[0];
        let expected = leftover + shares * closes[closes.len() - 1];

        prop_assert_eq!(result.trades.len(), 1);
        prop_assert_eq!(result.trades[0].shares, shares as u64);
        prop_assert!(
            (result.final_equity - expected).abs() < 1e-6,
            "final equity {} != expected {}",
            result.final_equity,
            expected
        );
    }
}

// ---- 5. Slippage works against the trader --------------------------------

proptest! {
    /// With identical signal prices, positive slippage pays more on the buy,
    /// receives less on the sell, and strictly lowers the trade's pnl_pct.
    #[test]
    fn slippage_strictly_reduces_trade_pnl_pct(
        entry in 10.0..500.0_f64,
        exit in 10.0..500.0_f64,
        slippage in 0.0005..0.02_f64,
    ) {
        let bars = make_bars(&[entry, exit]);
        let signals = vec![Signal::Buy, Signal::Sell];

        let clean = Backtester::new(BacktestConfig::default().with_slippage(0.0))
            .run(&FixedSignals(signals.clone()), &bars, None)
            .unwrap();
        let slipped = Backtester::new(BacktestConfig::default().with_slippage(slippage))
            .run(&FixedSignals(signals), &bars, None)
            .unwrap();

        prop_assert_eq!(clean.trades.len(), 1);
        prop_assert_eq!(slipped.trades.len(), 1);
        prop_assert!(slipped.trades[0].entry_price > clean.trades[0].entry_price);
        prop_assert!(slipped.trades[0].exit_price < clean.trades[0].exit_price);
        prop_assert!(slipped.trades[0].pnl_pct < clean.trades[0].pnl_pct);
    }
}

// ---- 6. Drawdown bounds --------------------------------------------------

proptest! {
    /// Max drawdown can never be positive, and the below-peak streak can
    /// never cover every point of the curve.
    #[test]
    fn drawdown_is_non_positive_with_bounded_duration(
        values in prop::collection::vec(100.0..100_000.0_f64, 1..100),
    ) {
        let curve = make_curve(&values);
        let (dd, duration) = backtester::metrics::max_drawdown(&curve);

        prop_assert!(dd <= 0.0);
        prop_assert!(duration < curve.len());
    }

    /// A curve that never declines has no drawdown at all.
    #[test]
    fn monotonic_equity_has_zero_drawdown(
        mut values in prop::collection::vec(100.0..100_000.0_f64, 1..50),
    ) {
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let curve = make_curve(&values);

        let (dd, duration) = backtester::metrics::max_drawdown(&curve);
        prop_assert_eq!(dd, 0.0);
        prop_assert_eq!(duration, 0);
    }
}

// ---- 7. Determinism ------------------------------------------------------

proptest! {
    /// The same inputs always produce bitwise-identical results.
    #[test]
    fn reruns_are_deterministic((closes, signals) in arb_market()) {
        let bars = make_bars(&closes);
        let strategy = FixedSignals(signals);
        let mut engine = Backtester::new(BacktestConfig::default());

        let first = engine.run(&strategy, &bars, None).unwrap();
        let second = engine.run(&strategy, &bars, None).unwrap();

        prop_assert_eq!(first.final_equity, second.final_equity);
        prop_assert_eq!(first.trades.len(), second.trades.len());
        prop_assert_eq!(first.metrics.total_return, second.metrics.total_return);
        prop_assert_eq!(first.metrics.max_drawdown, second.metrics.max_drawdown);
    }
}
