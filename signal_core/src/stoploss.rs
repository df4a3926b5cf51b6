//! Protective exit price, in one of three mutually exclusive modes.

use crate::config::{Config, StopLossMode};

/// A computed stop, or the reason one could not be computed.
///
/// An ATR stop above the current price (or below zero) is returned as-is;
/// treating an inverted stop as suspicious is the caller's call, not this
/// module's.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopLoss {
    /// A concrete exit price.
    Price {
        /// The exit price.
        price: f64,
        /// Distance below the current close, as a percentage of it.
        pct_below: f64,
    },
    /// The requested mode has no defined value for this series.
    NotComputable {
        /// Short explanation for display.
        reason: &'static str,
    },
}

/// Computes the stop for the configured mode.
///
/// `pivot_s1` is the S1 level when pivots exist; `None` (or a non-positive
/// S1) makes the pivot mode not computable rather than emitting a phantom
/// price.
pub fn compute_stop_loss(
    close: f64,
    atr_14: f64,
    pivot_s1: Option<f64>,
    config: &Config,
) -> StopLoss {
    let priced = |price: f64| StopLoss::Price {
        price,
        pct_below: (close - price) / close * 100.0,
    };

    match config.stop_loss {
        StopLossMode::AtrBased => priced(close - atr_14 * config.atr_multiplier),
        StopLossMode::FixedPct => priced(close * (1.0 - config.fixed_stop_pct / 100.0)),
        StopLossMode::PivotS1 => match pivot_s1 {
            Some(s1) if s1 > 0.0 => priced(s1),
            _ => StopLoss::NotComputable {
                reason: "pivot S1 undefined",
            },
        },
    }
}
