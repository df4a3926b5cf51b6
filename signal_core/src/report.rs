//! Flat, serializable result records for tabular display.

use serde::{Deserialize, Serialize};

use crate::config::Market;
use crate::score::{Signal, Trend};
use crate::stoploss::StopLoss;

/// The sole output of a successful per-ticker analysis. Immutable once
/// produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Ticker identifier as supplied by the caller.
    pub ticker: String,
    /// The classified signal.
    pub signal: Signal,
    /// Latest closing price.
    pub current_price: f64,
    /// Stop price, when the configured mode produced one.
    pub stop_loss_price: Option<f64>,
    /// Stop price rendered for display, or an N/A note.
    pub stop_loss_display: String,
    /// Target/resistance price: pivot R1 when available, else the swing high.
    pub target_price: f64,
    /// The 61.8% Fibonacci retracement level.
    pub fib_618: f64,
    /// Close of the highest-volume bar in the trailing window.
    pub max_volume_price: f64,
    /// RSI(14) at the latest bar.
    pub rsi: f64,
    /// Trend state at the latest bar.
    pub trend: Trend,
    /// True when the latest volume exceeds 1.5× its 20-bar mean.
    pub volume_surge: bool,
    /// Human-readable contributing reasons.
    pub reasons: Vec<String>,
}

/// A failed per-ticker analysis, folded into a displayable row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRow {
    /// Ticker identifier as supplied by the caller.
    pub ticker: String,
    /// Always [`Signal::Error`].
    pub signal: Signal,
    /// Why the analysis failed.
    pub reason: String,
}

/// One row per ticker: either a full result or an error record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportRow {
    /// Successful analysis.
    Ok(AnalysisResult),
    /// Failed analysis.
    Error(ErrorRow),
}

impl ReportRow {
    /// Builds an error row from any per-ticker failure.
    pub fn error(ticker: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Error(ErrorRow {
            ticker: ticker.into(),
            signal: Signal::Error,
            reason: reason.to_string(),
        })
    }

    /// The row's ticker.
    pub fn ticker(&self) -> &str {
        match self {
            Self::Ok(r) => &r.ticker,
            Self::Error(e) => &e.ticker,
        }
    }

    /// The row's signal label.
    pub fn signal(&self) -> Signal {
        match self {
            Self::Ok(r) => r.signal,
            Self::Error(e) => e.signal,
        }
    }
}

/// Stable-sorts rows for display: strongest buys first, errors last.
pub fn sort_by_signal(rows: &mut [ReportRow]) {
    rows.sort_by_key(|row| row.signal().rank());
}

/// Renders a price in the market's currency: `$1,234.56` or `₩1,235`.
pub fn format_price(market: Market, value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    match market {
        Market::Us => {
            let cents = (abs * 100.0).round() as u64;
            format!("{sign}${}.{:02}", group_thousands(cents / 100), cents % 100)
        }
        Market::Korea => format!("{sign}₩{}", group_thousands(abs.round() as u64)),
    }
}

/// Renders a stop-loss for display, e.g. `$95.20 (-4.80%)`.
pub fn format_stop_loss(market: Market, stop: &StopLoss) -> String {
    match stop {
        StopLoss::Price { price, pct_below } => {
            format!("{} ({:+.2}%)", format_price(market, *price), -pct_below)
        }
        StopLoss::NotComputable { reason } => format!("N/A ({reason})"),
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
