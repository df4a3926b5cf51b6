//! Caller-supplied analysis parameters.

use serde::{Deserialize, Serialize};

/// How the protective exit price is derived (serde snake_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopLossMode {
    /// `close - ATR_14 × atr_multiplier`.
    AtrBased,
    /// Classic pivot S1, when the pivot is defined.
    PivotS1,
    /// `close × (1 - fixed_stop_pct / 100)`.
    FixedPct,
}

/// Which market the ticker trades in.
///
/// Affects only currency formatting of display strings, never the numeric
/// logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Market {
    /// US equities, `$` with two decimals.
    Us,
    /// Korean equities, `₩` with no decimals.
    Korea,
}

/// Parameters for one analysis call. Owned by the caller, read-only here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Stop-loss mode.
    pub stop_loss: StopLossMode,
    /// ATR multiplier, used only in [`StopLossMode::AtrBased`]. Typical 1.0–5.0.
    pub atr_multiplier: f64,
    /// Fixed stop percentage, used only in [`StopLossMode::FixedPct`]. Typical 1–10.
    pub fixed_stop_pct: f64,
    /// Market, for currency formatting.
    pub market: Market,
    /// Fractional ± band within which price counts as "at" a level (0.025 = 2.5%).
    pub proximity_tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stop_loss: StopLossMode::FixedPct,
            atr_multiplier: 2.0,
            fixed_stop_pct: 3.0,
            market: Market::Us,
            proximity_tolerance: 0.025,
        }
    }
}
