//! Per-ticker analysis pipeline and the parallel batch driver.
//!
//! One ticker runs strictly sequentially: indicators → structural levels →
//! score/classify → stop-loss → one record. Tickers share nothing, so the
//! batch driver fans them out with rayon and reassembles rows in input
//! order.

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::AnalysisError;
use crate::indicators::{IndicatorSet, MIN_BARS};
use crate::levels::StructuralLevels;
use crate::models::PriceSeries;
use crate::report::{AnalysisResult, ReportRow, format_stop_loss};
use crate::score::score_and_classify;
use crate::stoploss::{StopLoss, compute_stop_loss};

/// Analyzes one ticker's history.
///
/// Pure over its inputs: calling twice on the same series and configuration
/// yields identical results. Fails fast with [`AnalysisError::InsufficientData`]
/// below [`MIN_BARS`] bars.
pub fn analyze(series: &PriceSeries, config: &Config) -> Result<AnalysisResult, AnalysisError> {
    if series.len() < MIN_BARS {
        return Err(AnalysisError::InsufficientData {
            got: series.len(),
            need: MIN_BARS,
        });
    }
    let latest = *series.latest().ok_or(AnalysisError::InsufficientData {
        got: 0,
        need: MIN_BARS,
    })?;

    let indicators = IndicatorSet::compute(series);
    let snapshot = indicators.latest()?;
    let levels = StructuralLevels::compute(series);

    let card = score_and_classify(&latest, &snapshot, &levels, config);
    let stop = compute_stop_loss(
        latest.close,
        snapshot.atr_14,
        levels.pivot.map(|p| p.s1),
        config,
    );
    let target_price = levels.pivot.map(|p| p.r1).unwrap_or(levels.fib.swing_high);

    debug!(
        ticker = series.ticker(),
        signal = card.signal.as_str(),
        buy_score = card.buy_score,
        sell_score = card.sell_score,
        trend = card.trend.as_str(),
        "ticker scored"
    );

    Ok(AnalysisResult {
        ticker: series.ticker().to_string(),
        signal: card.signal,
        current_price: latest.close,
        stop_loss_price: match stop {
            StopLoss::Price { price, .. } => Some(price),
            StopLoss::NotComputable { .. } => None,
        },
        stop_loss_display: format_stop_loss(config.market, &stop),
        target_price,
        fib_618: levels.fib.level_618,
        max_volume_price: levels.max_volume_price,
        rsi: snapshot.rsi_14,
        trend: card.trend,
        volume_surge: card.volume_surge,
        reasons: card.reasons,
    })
}

/// Analyzes one ticker, folding any failure into an error row.
///
/// This is the per-ticker recovery boundary: nothing propagates past it.
pub fn analyze_to_row(series: &PriceSeries, config: &Config) -> ReportRow {
    match analyze(series, config) {
        Ok(result) => ReportRow::Ok(result),
        Err(err) => {
            warn!(ticker = series.ticker(), error = %err, "analysis failed");
            ReportRow::error(series.ticker(), err)
        }
    }
}

/// Analyzes many tickers in parallel.
///
/// Each series is independent, so per-ticker work fans out across the rayon
/// pool; the returned map preserves the input order regardless of which
/// ticker finished first. One ticker's failure never affects another's row.
pub fn analyze_many(series: &[PriceSeries], config: &Config) -> IndexMap<String, ReportRow> {
    series
        .par_iter()
        .map(|s| (s.ticker().to_string(), analyze_to_row(s, config)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}
