//! A validated, chronologically ordered series of bars for one ticker.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::bar::Bar;

/// Errors raised while constructing a [`PriceSeries`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    /// A bar violates `low ≤ open,close ≤ high` or contains a non-finite or
    /// negative value.
    #[error("invalid bar at index {index}")]
    InvalidBar {
        /// Position of the offending bar.
        index: usize,
    },

    /// Bars are out of order or share a timestamp.
    #[error("bars not strictly chronological at index {index}")]
    OutOfOrder {
        /// Position of the first bar that is not strictly after its predecessor.
        index: usize,
    },
}

/// One ticker's ordered OHLCV history.
///
/// Owned per analysis call; the core never persists or mutates it. The
/// constructor enforces strict chronological order (which also rules out
/// duplicate timestamps) and per-bar invariants, so downstream code can index
/// freely without re-checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Validates and wraps a bar history.
    pub fn new(ticker: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.is_valid() {
                return Err(SeriesError::InvalidBar { index });
            }
        }
        for index in 1..bars.len() {
            if bars[index].timestamp <= bars[index - 1].timestamp {
                return Err(SeriesError::OutOfOrder { index });
            }
        }
        Ok(Self {
            ticker: ticker.into(),
            bars,
        })
    }

    /// The ticker this history belongs to.
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// The bars, oldest first.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// True when the series holds no bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent bar, if any.
    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Closing prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}
