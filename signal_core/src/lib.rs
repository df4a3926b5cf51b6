//! Signal-scoring core for equities.
//!
//! Given one ticker's daily OHLCV history and a small set of user-chosen
//! parameters, this crate decides whether the ticker currently sits at an
//! actionable technical-confluence point (buy, sell, or hold) and computes a
//! protective exit price. It is a pure computation layer: no data fetching,
//! no rendering, no persistence. Data acquisition and display belong to the
//! caller.
//!
//! The pipeline for one ticker is strictly sequential:
//! indicators → structural levels → score/classify → stop-loss → one
//! [`AnalysisResult`](report::AnalysisResult). Different tickers are fully
//! independent and may be analyzed in parallel; see
//! [`analyze::analyze_many`].

pub mod analyze;
pub mod config;
pub mod errors;
pub mod indicators;
pub mod levels;
pub mod models;
pub mod report;
pub mod score;
pub mod stoploss;

pub use analyze::{analyze, analyze_many, analyze_to_row};
pub use config::{Config, Market, StopLossMode};
pub use errors::AnalysisError;
pub use models::{Bar, PriceSeries};
pub use report::{AnalysisResult, ReportRow};
pub use score::{Signal, Trend};
