//! Structural price levels: classic pivots, Fibonacci retracements, and the
//! max-volume close (a point-of-control proxy).

use crate::models::PriceSeries;

/// Trailing window for the Fibonacci swing, capped at series length.
pub const FIB_WINDOW: usize = 120;

/// Trailing window for the max-volume scan, capped at series length.
pub const VOLUME_WINDOW: usize = 240;

/// Classic pivot levels from the prior bar's high/low/close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotLevels {
    /// The pivot itself, `(H + L + C) / 3`.
    pub p: f64,
    /// First support, `2P - H`.
    pub s1: f64,
    /// Second support, `P - (H - L)`.
    pub s2: f64,
    /// First resistance, `2P - L`.
    pub r1: f64,
    /// Second resistance, `P + (H - L)`.
    pub r2: f64,
}

/// Fibonacci retracement levels over the trailing swing window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibLevels {
    /// The 61.8% retracement from the swing high.
    pub level_618: f64,
    /// The 50% retracement from the swing high.
    pub level_500: f64,
    /// Highest high in the window.
    pub swing_high: f64,
    /// Lowest low in the window.
    pub swing_low: f64,
}

/// Every structural level the scorer consults.
///
/// Pivots are `None` when fewer than 2 bars exist; downstream code treats a
/// missing pivot as "not applicable", never as a price of zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructuralLevels {
    /// Pivot family, from the second-to-last bar.
    pub pivot: Option<PivotLevels>,
    /// Fibonacci retracement family.
    pub fib: FibLevels,
    /// Close of the highest-volume bar in the trailing window.
    pub max_volume_price: f64,
}

impl StructuralLevels {
    /// Derives all levels from the series.
    ///
    /// Pivots deliberately use the second-to-last bar: the latest bar's
    /// high/low are not settled while the session is open.
    pub fn compute(series: &PriceSeries) -> Self {
        let bars = series.bars();

        let pivot = if bars.len() >= 2 {
            let prev = &bars[bars.len() - 2];
            let p = (prev.high + prev.low + prev.close) / 3.0;
            Some(PivotLevels {
                p,
                s1: 2.0 * p - prev.high,
                s2: p - (prev.high - prev.low),
                r1: 2.0 * p - prev.low,
                r2: p + (prev.high - prev.low),
            })
        } else {
            None
        };

        let fib_window = &bars[bars.len().saturating_sub(FIB_WINDOW)..];
        let swing_high = fib_window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let swing_low = fib_window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let range = swing_high - swing_low;
        let fib = FibLevels {
            level_618: swing_high - 0.618 * range,
            level_500: swing_high - 0.5 * range,
            swing_high,
            swing_low,
        };

        // `max_by` keeps the last of equal maxima, so the most recent bar
        // wins a volume tie.
        let vol_window = &bars[bars.len().saturating_sub(VOLUME_WINDOW)..];
        let max_volume_price = vol_window
            .iter()
            .max_by(|a, b| {
                a.volume
                    .partial_cmp(&b.volume)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|b| b.close)
            .unwrap_or(0.0);

        Self {
            pivot,
            fib,
            max_volume_price,
        }
    }
}
