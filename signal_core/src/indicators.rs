//! Rolling technical indicators over an ordered daily series.
//!
//! Every function returns one value per input bar, `None` during the warm-up
//! period of its window. [`IndicatorSet::compute`] derives all columns the
//! scorer consumes; the derivation is pure, the input series is never
//! touched.

use crate::errors::AnalysisError;
use crate::models::PriceSeries;

/// Minimum bars required before any analysis is attempted.
///
/// The 200-period SMA needs a full window at the latest row; shorter
/// histories are rejected up front rather than producing a degraded result.
pub const MIN_BARS: usize = 200;

/// Volume counts as a surge when it exceeds this multiple of its 20-bar mean.
pub const VOLUME_SURGE_RATIO: f64 = 1.5;

/// Simple moving average over the trailing `period` values.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let mut sum: f64 = values[..period].iter().sum();
    out[period - 1] = Some(sum / period as f64);
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out[i] = Some(sum / period as f64);
    }
    out
}

/// Wilder's RSI over the trailing `period` closes.
///
/// Seeded with the simple mean of the first `period` gains/losses, then
/// smoothed. An all-gain window reads 100; a window with no movement at all
/// reads a neutral 50 rather than the 0/0 indeterminate form.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            avg_gain += delta;
        } else {
            avg_loss += -delta;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in (period + 1)..closes.len() {
        let delta = closes[i] - closes[i - 1];
        let (gain, loss) = if delta > 0.0 { (delta, 0.0) } else { (0.0, -delta) };
        avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

/// Bollinger band triple at one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerRow {
    /// Lower band, `mid - k·σ`.
    pub lower: f64,
    /// The moving average itself.
    pub mid: f64,
    /// Upper band, `mid + k·σ`.
    pub upper: f64,
}

/// Bollinger Bands: SMA envelope at ± `k` sample standard deviations.
pub fn bollinger(closes: &[f64], period: usize, k: f64) -> Vec<Option<BollingerRow>> {
    let mut out = vec![None; closes.len()];
    if period < 2 || closes.len() < period {
        return out;
    }
    for i in (period - 1)..closes.len() {
        let window = &closes[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        // Sample (n-1) standard deviation, the common TA convention.
        let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (period - 1) as f64;
        let sd = var.sqrt();
        out[i] = Some(BollingerRow {
            lower: mean - k * sd,
            mid: mean,
            upper: mean + k * sd,
        });
    }
    out
}

/// Wilder-smoothed Average True Range over `period` bars.
pub fn atr(series: &PriceSeries, period: usize) -> Vec<Option<f64>> {
    let bars = series.bars();
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() <= period {
        return out;
    }

    // True Range is defined from the second bar on.
    let tr: Vec<f64> = (1..bars.len())
        .map(|i| {
            let hl = bars[i].high - bars[i].low;
            let hc = (bars[i].high - bars[i - 1].close).abs();
            let lc = (bars[i].low - bars[i - 1].close).abs();
            hl.max(hc).max(lc)
        })
        .collect();

    let mut value: f64 = tr[..period].iter().sum::<f64>() / period as f64;
    out[period] = Some(value);
    for i in (period + 1)..bars.len() {
        value = (value * (period - 1) as f64 + tr[i - 1]) / period as f64;
        out[i] = Some(value);
    }
    out
}

/// All derived columns, one entry per bar.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    /// 20-period SMA of close.
    pub sma_20: Vec<Option<f64>>,
    /// 60-period SMA of close.
    pub sma_60: Vec<Option<f64>>,
    /// 120-period SMA of close.
    pub sma_120: Vec<Option<f64>>,
    /// 200-period SMA of close.
    pub sma_200: Vec<Option<f64>>,
    /// Wilder RSI(14), bounded [0, 100].
    pub rsi_14: Vec<Option<f64>>,
    /// Bollinger(20, 2σ) rows.
    pub bollinger: Vec<Option<BollingerRow>>,
    /// Wilder ATR(14).
    pub atr_14: Vec<Option<f64>>,
    /// 20-period SMA of volume, for the surge flag.
    pub volume_ma_20: Vec<Option<f64>>,
}

/// The latest row of every column, all present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    /// 20-period SMA at the latest bar.
    pub sma_20: f64,
    /// 60-period SMA at the latest bar.
    pub sma_60: f64,
    /// 120-period SMA at the latest bar.
    pub sma_120: f64,
    /// 200-period SMA at the latest bar.
    pub sma_200: f64,
    /// RSI(14) at the latest bar.
    pub rsi_14: f64,
    /// Bollinger bands at the latest bar.
    pub bollinger: BollingerRow,
    /// ATR(14) at the latest bar.
    pub atr_14: f64,
    /// 20-period volume mean at the latest bar.
    pub volume_ma_20: f64,
}

impl IndicatorSet {
    /// Derives every column from the series.
    pub fn compute(series: &PriceSeries) -> Self {
        let closes = series.closes();
        let volumes: Vec<f64> = series.bars().iter().map(|b| b.volume).collect();
        Self {
            sma_20: sma(&closes, 20),
            sma_60: sma(&closes, 60),
            sma_120: sma(&closes, 120),
            sma_200: sma(&closes, 200),
            rsi_14: rsi(&closes, 14),
            bollinger: bollinger(&closes, 20, 2.0),
            atr_14: atr(series, 14),
            volume_ma_20: sma(&volumes, 20),
        }
    }

    /// The final row with every column defined.
    ///
    /// With [`MIN_BARS`] enforced by the caller this cannot fail; the error
    /// path exists as a defensive check against a column that never warmed
    /// up.
    pub fn latest(&self) -> Result<IndicatorSnapshot, AnalysisError> {
        fn last<T: Copy>(col: &[Option<T>], name: &'static str) -> Result<T, AnalysisError> {
            col.last()
                .copied()
                .flatten()
                .ok_or(AnalysisError::IndicatorComputationFailure(name))
        }

        Ok(IndicatorSnapshot {
            sma_20: last(&self.sma_20, "SMA_20")?,
            sma_60: last(&self.sma_60, "SMA_60")?,
            sma_120: last(&self.sma_120, "SMA_120")?,
            sma_200: last(&self.sma_200, "SMA_200")?,
            rsi_14: last(&self.rsi_14, "RSI_14")?,
            bollinger: last(&self.bollinger, "BB_20_2")?,
            atr_14: last(&self.atr_14, "ATR_14")?,
            volume_ma_20: last(&self.volume_ma_20, "VOL_MA_20")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use crate::models::Bar;

    fn close(v: f64) -> Bar {
        Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            open: v,
            high: v,
            low: v,
            close: v,
            volume: 1_000.0,
        }
    }

    fn series_of(closes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                timestamp: start + Duration::days(i as i64),
                ..close(c)
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn sma_warm_up_and_values() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert_close(out[2].unwrap(), 2.0);
        assert_close(out[3].unwrap(), 3.0);
        assert_close(out[4].unwrap(), 4.0);
    }

    #[test]
    fn sma_too_short_is_all_none() {
        assert!(sma(&[1.0, 2.0], 3).iter().all(|v| v.is_none()));
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&closes, 14);
        assert_eq!(out[13], None);
        assert_close(out[14].unwrap(), 100.0);
        assert_close(out[29].unwrap(), 100.0);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 - i as f64 * 0.5).collect();
        let out = rsi(&closes, 14);
        assert_close(out[29].unwrap(), 0.0);
    }

    #[test]
    fn rsi_flat_is_neutral_50() {
        let closes = vec![100.0; 30];
        let out = rsi(&closes, 14);
        assert_close(out[29].unwrap(), 50.0);
    }

    #[test]
    fn rsi_stays_bounded() {
        let closes: Vec<f64> = (0..100)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 10.0)
            .collect();
        for v in rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v));
        }
    }

    #[test]
    fn bollinger_sample_stddev() {
        // Alternating 99/101: mean 100, sample variance 20/19.
        let closes: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 99.0 } else { 101.0 }).collect();
        let row = bollinger(&closes, 20, 2.0)[19].unwrap();
        let sd = (20.0_f64 / 19.0).sqrt();
        assert_close(row.mid, 100.0);
        assert_close(row.upper, 100.0 + 2.0 * sd);
        assert_close(row.lower, 100.0 - 2.0 * sd);
    }

    #[test]
    fn bollinger_collapses_on_flat_closes() {
        let closes = vec![100.0; 25];
        let row = bollinger(&closes, 20, 2.0)[24].unwrap();
        assert_close(row.lower, 100.0);
        assert_close(row.mid, 100.0);
        assert_close(row.upper, 100.0);
    }

    #[test]
    fn atr_constant_range() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars: Vec<Bar> = (0..30)
            .map(|i| Bar {
                timestamp: start + Duration::days(i as i64),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0,
                volume: 1_000.0,
            })
            .collect();
        let series = PriceSeries::new("TEST", bars).unwrap();
        let out = atr(&series, 14);
        assert_eq!(out[13], None);
        assert_close(out[14].unwrap(), 2.0);
        assert_close(out[29].unwrap(), 2.0);
    }

    #[test]
    fn atr_uses_gap_to_prior_close() {
        // Second bar gaps far above the first close; TR must use |high - prev_close|.
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut bars: Vec<Bar> = (0..16)
            .map(|i| Bar {
                timestamp: start + Duration::days(i as i64),
                open: 100.0,
                high: 100.5,
                low: 99.5,
                close: 100.0,
                volume: 1_000.0,
            })
            .collect();
        bars[1].open = 110.0;
        bars[1].high = 110.0;
        bars[1].low = 109.0;
        bars[1].close = 109.5;
        bars[2].open = 109.5;
        bars[2].high = 109.5;
        bars[2].low = 99.5;
        bars[2].close = 100.0;
        let series = PriceSeries::new("TEST", bars).unwrap();
        let out = atr(&series, 14);
        // TR[0] = max(1.0, |110-100|, |109-100|) = 10.0 lifts the seed mean.
        assert!(out[14].unwrap() > 1.0);
    }

    #[test]
    fn snapshot_requires_full_warm_up() {
        let closes: Vec<f64> = (0..150).map(|i| 100.0 + i as f64 * 0.1).collect();
        let set = IndicatorSet::compute(&series_of(&closes));
        assert_eq!(
            set.latest(),
            Err(AnalysisError::IndicatorComputationFailure("SMA_200"))
        );
    }

    #[test]
    fn snapshot_complete_at_200_bars() {
        let closes: Vec<f64> = (0..200).map(|i| 100.0 + i as f64 * 0.1).collect();
        let set = IndicatorSet::compute(&series_of(&closes));
        let snap = set.latest().unwrap();
        assert!(snap.sma_200 > 0.0);
        assert!((0.0..=100.0).contains(&snap.rsi_14));
    }
}
