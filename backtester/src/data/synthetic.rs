use chrono::{Duration, TimeZone, Utc};
use common::Bar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Daily volatility of the random walk, roughly a 3x leveraged ETF
const DAILY_VOLATILITY: f64 = 0.03;
/// Slight upward drift per day
const DAILY_DRIFT: f64 = 0.0001;

/// Generate a seeded random-walk price series.
///
/// The same seed always produces the same bars, so CLI runs and tests are
/// reproducible. Timestamps start at a fixed date and advance one day per bar.
pub fn generate_bars(days: usize, initial_price: f64, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bars = Vec::with_capacity(days);

    let mut price = initial_price;
    let start_date = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();

    for i in 0..days {
        let date = start_date + Duration::days(i as i64);

        let random_return: f64 = rng.gen_range(-1.0..1.0);
        let daily_return = DAILY_DRIFT + DAILY_VOLATILITY * random_return;
        let new_price = price * (1.0 + daily_return);

        let intraday_range = price * rng.gen_range(0.01..0.04);
        let open = price + rng.gen_range(-intraday_range / 2.0..intraday_range / 2.0);
        let close = new_price;
        let high = open.max(close) + rng.gen_range(0.0..intraday_range / 2.0);
        let low = open.min(close) - rng.gen_range(0.0..intraday_range / 2.0);

        // Volume swells on volatile days
        let base_volume = 50_000_000u64;
        let volume_multiplier = 1.0 + daily_return.abs() * 10.0;
        let volume = (base_volume as f64 * volume_multiplier * rng.gen_range(0.8..1.2)) as u64;

        bars.push(Bar::new(date, open, high, low, close, volume));

        price = new_price;
    }

    bars
}

/// Generate a deterministic drifting series with no randomness.
///
/// Each close moves by `daily_drift` relative to the previous one; handy for
/// tests that need a predictable trend.
pub fn generate_trending_bars(days: usize, initial_price: f64, daily_drift: f64) -> Vec<Bar> {
    let mut bars = Vec::with_capacity(days);
    let mut price = initial_price;
    let start_date = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();

    for i in 0..days {
        let date = start_date + Duration::days(i as i64);
        let new_price = price * (1.0 + daily_drift);
        let range = price * 0.005;

        bars.push(Bar::new(
            date,
            price,
            price.max(new_price) + range,
            price.min(new_price) - range,
            new_price,
            50_000_000,
        ));

        price = new_price;
    }

    bars
}
