use thiserror::Error;

/// The unified error type for a single ticker's analysis.
///
/// Every variant is local to one ticker; the result assembler recovers all of
/// them into an error row, so none of these ever crosses the per-ticker
/// boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The series is too short to establish the indicator warm-up.
    #[error("insufficient data: {got} bars, need at least {need}")]
    InsufficientData {
        /// Bars actually supplied.
        got: usize,
        /// Minimum bars required.
        need: usize,
    },

    /// An expected indicator column was absent at the latest row.
    ///
    /// Defensive check only: with the 200-bar minimum enforced up front this
    /// should never fire.
    #[error("indicator computation failed: {0} undefined at latest bar")]
    IndicatorComputationFailure(&'static str),
}
