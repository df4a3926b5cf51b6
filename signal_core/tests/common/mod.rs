//! Series builders shared across integration tests.
#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use signal_core::{Bar, PriceSeries};

/// Daily bars starting 2024-01-01, one per call to `f(i) -> (o, h, l, c, v)`.
pub fn series_with(ticker: &str, n: usize, f: impl Fn(usize) -> (f64, f64, f64, f64, f64)) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let bars = (0..n)
        .map(|i| {
            let (open, high, low, close, volume) = f(i);
            Bar {
                timestamp: start + Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume,
            }
        })
        .collect();
    PriceSeries::new(ticker, bars).unwrap()
}

/// A perfectly flat series: every price equal, constant volume.
pub fn flat_series(ticker: &str, n: usize, price: f64) -> PriceSeries {
    series_with(ticker, n, |_| (price, price, price, price, 10_000.0))
}

/// Close rising linearly from `from` to `to`, with a small intrabar range.
pub fn rising_series(ticker: &str, n: usize, from: f64, to: f64) -> PriceSeries {
    let step = (to - from) / (n - 1) as f64;
    series_with(ticker, n, move |i| {
        let close = from + step * i as f64;
        (close - 0.2, close + 0.5, close - 0.7, close, 10_000.0)
    })
}
