//! Confluence scoring and signal classification.
//!
//! A deterministic decision table, not a statistical model: trend state,
//! proximity to each support/resistance level, RSI thresholds, and the
//! volume-surge flag combine into buy/sell scores, and score + trend map to
//! one discrete signal with human-readable reasons.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::indicators::{IndicatorSnapshot, VOLUME_SURGE_RATIO};
use crate::levels::StructuralLevels;
use crate::models::Bar;

/// Long-horizon trend state: above or below the 200-period SMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Close above SMA_200.
    Up,
    /// Close at or below SMA_200.
    Down,
}

impl Trend {
    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
        }
    }
}

/// The closed set of signal labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Highest-confidence buy: heavy confluence at support.
    StrongBuyPlus,
    /// Strong buy.
    StrongBuy,
    /// Buy candidate on a pullback within an uptrend.
    ConsiderBuy,
    /// Heavy confluence at resistance; take profit.
    TakeProfit,
    /// Mild resistance pressure; trim the position.
    PartialSell,
    /// Counter-trend buy setup inside a downtrend.
    SpeculativeRebound,
    /// Nothing actionable.
    Hold,
    /// Analysis failed for this ticker.
    Error,
}

impl Signal {
    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::StrongBuyPlus => "strong_buy_plus",
            Signal::StrongBuy => "strong_buy",
            Signal::ConsiderBuy => "consider_buy",
            Signal::TakeProfit => "take_profit",
            Signal::PartialSell => "partial_sell",
            Signal::SpeculativeRebound => "speculative_rebound",
            Signal::Hold => "hold",
            Signal::Error => "error",
        }
    }

    /// Sort rank for tabular display: buys first, errors last.
    pub fn rank(&self) -> u8 {
        match self {
            Signal::StrongBuyPlus => 0,
            Signal::StrongBuy => 1,
            Signal::ConsiderBuy => 2,
            Signal::SpeculativeRebound => 3,
            Signal::Hold => 4,
            Signal::PartialSell => 5,
            Signal::TakeProfit => 6,
            Signal::Error => 7,
        }
    }
}

/// Everything the scorer decided for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct Scorecard {
    /// The classified signal.
    pub signal: Signal,
    /// Trend state at the latest bar.
    pub trend: Trend,
    /// Accumulated buy-direction score.
    pub buy_score: f64,
    /// Accumulated sell-direction score.
    pub sell_score: f64,
    /// Names of support levels the close sits at.
    pub support_hits: Vec<&'static str>,
    /// Names of resistance levels the close sits at.
    pub resistance_hits: Vec<&'static str>,
    /// True when the latest volume exceeds 1.5× its 20-bar mean.
    pub volume_surge: bool,
    /// Human-readable contributing reasons.
    pub reasons: Vec<String>,
}

/// Weight of each support/resistance confluence hit.
const HIT_WEIGHT: f64 = 1.5;

/// Weight of the close-vs-pivot trend-strength bonus.
const PIVOT_BONUS: f64 = 0.5;

/// Two-sided proximity test: the close sits within ±tol of a real level.
fn at_support(close: f64, level: f64, tol: f64) -> bool {
    level > 0.0 && close >= level * (1.0 - tol) && close <= level * (1.0 + tol)
}

/// One-sided resistance test: the close has reached up into the level's band.
fn at_resistance(close: f64, level: f64, tol: f64) -> bool {
    level > 0.0 && close >= level * (1.0 - tol)
}

/// Scores the latest bar against indicators and levels, then classifies.
///
/// Pure function of its arguments; called once per ticker per analysis.
pub fn score_and_classify(
    latest: &Bar,
    snap: &IndicatorSnapshot,
    levels: &StructuralLevels,
    config: &Config,
) -> Scorecard {
    let close = latest.close;
    let rsi = snap.rsi_14;
    let tol = config.proximity_tolerance;
    let trend = if close > snap.sma_200 { Trend::Up } else { Trend::Down };
    let up = trend == Trend::Up;

    let volume_surge =
        snap.volume_ma_20 > 0.0 && latest.volume > snap.volume_ma_20 * VOLUME_SURGE_RATIO;

    // A series with no range at all collapses every level onto the close and
    // makes each proximity test vacuously true. Nothing is actionable there.
    if snap.atr_14 == 0.0 {
        return Scorecard {
            signal: Signal::Hold,
            trend,
            buy_score: 0.0,
            sell_score: 0.0,
            support_hits: Vec::new(),
            resistance_hits: Vec::new(),
            volume_surge,
            reasons: Vec::new(),
        };
    }

    let mut support_hits = Vec::new();
    let support_levels: [(&'static str, Option<f64>); 6] = [
        ("BB lower band", Some(snap.bollinger.lower)),
        ("pivot S1", levels.pivot.map(|p| p.s1)),
        ("fib 0.618", Some(levels.fib.level_618)),
        ("SMA 60", Some(snap.sma_60)),
        ("SMA 120", Some(snap.sma_120)),
        ("max-volume price", Some(levels.max_volume_price)),
    ];
    for (name, level) in support_levels {
        if let Some(level) = level
            && at_support(close, level, tol)
        {
            support_hits.push(name);
        }
    }

    let mut resistance_hits = Vec::new();
    let resistance_levels: [(&'static str, Option<f64>); 4] = [
        ("BB upper band", Some(snap.bollinger.upper)),
        ("pivot R1", levels.pivot.map(|p| p.r1)),
        ("pivot R2", levels.pivot.map(|p| p.r2)),
        ("swing high", Some(levels.fib.swing_high)),
    ];
    for (name, level) in resistance_levels {
        if let Some(level) = level
            && at_resistance(close, level, tol)
        {
            resistance_hits.push(name);
        }
    }

    let mut buy_score = HIT_WEIGHT * support_hits.len() as f64;
    if let Some(pivot) = levels.pivot
        && close > pivot.p
    {
        buy_score += PIVOT_BONUS;
    }
    if rsi < 35.0 {
        buy_score += 2.0;
    } else if rsi < 45.0 && up {
        buy_score += 1.0;
    }

    let mut sell_score = HIT_WEIGHT * resistance_hits.len() as f64;
    if let Some(pivot) = levels.pivot
        && close < pivot.p
    {
        sell_score += PIVOT_BONUS;
    }
    if rsi > 70.0 {
        sell_score += 2.0;
    } else if rsi > 65.0 {
        sell_score += 1.0;
    }

    let s_hits = support_hits.len();
    let r_hits = resistance_hits.len();

    // Priority table: first match wins.
    let signal = if rsi < 60.0 && (buy_score >= 5.0 || (up && s_hits >= 3)) {
        Signal::StrongBuyPlus
    } else if rsi < 60.0 && (buy_score >= 3.5 || (up && s_hits >= 2)) {
        Signal::StrongBuy
    } else if rsi < 55.0 && up && (buy_score >= 2.0 || s_hits >= 1) {
        Signal::ConsiderBuy
    } else if sell_score >= 3.0 || (r_hits >= 1 && rsi > 70.0) {
        Signal::TakeProfit
    } else if sell_score >= 1.5 {
        Signal::PartialSell
    } else if !up && buy_score >= 3.0 {
        Signal::SpeculativeRebound
    } else {
        Signal::Hold
    };

    let mut reasons: Vec<String> = Vec::new();
    for name in &support_hits {
        reasons.push(format!("at support: {name}"));
    }
    for name in &resistance_hits {
        reasons.push(format!("at resistance: {name}"));
    }
    if rsi < 35.0 {
        reasons.push(format!("RSI oversold ({rsi:.1})"));
    } else if rsi < 45.0 && up {
        reasons.push(format!("RSI pullback in uptrend ({rsi:.1})"));
    } else if rsi > 70.0 {
        reasons.push(format!("RSI overbought ({rsi:.1})"));
    } else if rsi > 65.0 {
        reasons.push(format!("RSI stretched ({rsi:.1})"));
    }
    if volume_surge {
        reasons.push("volume surge".to_string());
    }

    Scorecard {
        signal,
        trend,
        buy_score,
        sell_score,
        support_hits,
        resistance_hits,
        volume_surge,
        reasons,
    }
}
