use thiserror::Error;

/// Structural misuse of the estimator. Data degeneracy never ends up here;
/// it resolves to `f64::NAN` at the affected position instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EdgeError {
    #[error("open, high, low, close must have the same length (open={open}, high={high}, low={low}, close={close})")]
    LengthMismatch {
        open: usize,
        high: usize,
        low: usize,
        close: usize,
    },

    #[error("supplied mid-price length {mid} does not match price length {expected}")]
    MidLengthMismatch { mid: usize, expected: usize },

    #[error("mid-price rule 'supplied' requires a mid-price sequence")]
    MissingMidPrice,

    #[error("invalid window {window}: must be >= {min}")]
    InvalidWindow { window: usize, min: usize },

    #[error("invalid min_periods {min_periods}: {reason}")]
    InvalidMinPeriods { min_periods: usize, reason: String },

    #[error("invalid step {0}: must be > 0")]
    InvalidStep(usize),
}
