//! Rolling and expanding spread estimates.
//!
//! [`EdgeEngine`] chains the price transformer, the feature terms, a
//! [`MomentWindow`] and the reconstructor. Each pushed bar costs O(1) in the
//! window size, and the value emitted at position `t` equals the
//! single-window estimator evaluated on the bars the window covers.

use crate::error::EdgeError;
use crate::features::FeatureVector;
use crate::model::bar::Bar;
use crate::model::series::PriceSeries;
use crate::reconstruct::estimate;
use crate::transform::{log_bars, LogBar, MidPrice, PriceTransformer};
use crate::window::{MomentWindow, WindowMode};

/// Smallest window and `min_periods` accepted in rolling mode.
pub const MIN_WINDOW: usize = 3;

/// Trailing-window configuration.
///
/// `window` counts transformed records, so a window of `W` at position `t`
/// spans the `W + 1` bars `t-W ..= t`. `min_periods` defaults to `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingConfig {
    pub window: usize,
    pub min_periods: Option<usize>,
    pub step: usize,
    pub sign: bool,
    pub mid: MidPrice,
}

impl RollingConfig {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            min_periods: None,
            step: 1,
            sign: false,
            mid: MidPrice::default(),
        }
    }

    pub fn with_min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = Some(min_periods);
        self
    }

    /// Emit only every `step`-th position, starting at position 0.
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    pub fn with_sign(mut self, sign: bool) -> Self {
        self.sign = sign;
        self
    }

    pub fn with_mid(mut self, mid: MidPrice) -> Self {
        self.mid = mid;
        self
    }

    pub fn effective_min_periods(&self) -> usize {
        self.min_periods.unwrap_or(self.window)
    }

    pub fn validate(&self) -> Result<(), EdgeError> {
        if self.window < MIN_WINDOW {
            return Err(EdgeError::InvalidWindow {
                window: self.window,
                min: MIN_WINDOW,
            });
        }
        let min_periods = self.effective_min_periods();
        if min_periods < MIN_WINDOW {
            return Err(EdgeError::InvalidMinPeriods {
                min_periods,
                reason: format!("must be >= {}", MIN_WINDOW),
            });
        }
        if min_periods > self.window {
            return Err(EdgeError::InvalidMinPeriods {
                min_periods,
                reason: format!("must not exceed window {}", self.window),
            });
        }
        if self.step == 0 {
            return Err(EdgeError::InvalidStep(self.step));
        }
        Ok(())
    }
}

/// Expanding-window configuration.
///
/// `min_periods` defaults to 1. The estimate at position `t` equals a rolling
/// estimate with `window = t + 1` only when both are given the same
/// `min_periods`: a rolling window defaults to `min_periods = window`, which
/// the always-missing record at position 0 can never reach, so a growing
/// rolling window with default settings is `NaN` at every position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandingConfig {
    pub min_periods: usize,
    pub sign: bool,
    pub mid: MidPrice,
}

impl Default for ExpandingConfig {
    fn default() -> Self {
        Self {
            min_periods: 1,
            sign: false,
            mid: MidPrice::default(),
        }
    }
}

impl ExpandingConfig {
    pub fn with_min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = min_periods;
        self
    }

    pub fn with_sign(mut self, sign: bool) -> Self {
        self.sign = sign;
        self
    }

    pub fn with_mid(mut self, mid: MidPrice) -> Self {
        self.mid = mid;
        self
    }

    pub fn validate(&self) -> Result<(), EdgeError> {
        if self.min_periods == 0 {
            return Err(EdgeError::InvalidMinPeriods {
                min_periods: 0,
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

/// One estimation pass. Owns its aggregation state; build a fresh engine
/// for every series.
#[derive(Debug, Clone)]
pub struct EdgeEngine {
    transformer: PriceTransformer,
    window: MomentWindow,
    sign: bool,
    mid: MidPrice,
    positions: usize,
}

impl EdgeEngine {
    pub fn rolling(cfg: &RollingConfig) -> Result<Self, EdgeError> {
        cfg.validate()?;
        let window = MomentWindow::new(
            WindowMode::Trailing(cfg.window),
            cfg.effective_min_periods(),
        )?;
        Ok(Self::with_window(window, cfg.sign, cfg.mid))
    }

    pub fn expanding(cfg: &ExpandingConfig) -> Result<Self, EdgeError> {
        cfg.validate()?;
        let window = MomentWindow::new(WindowMode::Expanding, cfg.min_periods)?;
        Ok(Self::with_window(window, cfg.sign, cfg.mid))
    }

    fn with_window(window: MomentWindow, sign: bool, mid: MidPrice) -> Self {
        Self {
            transformer: PriceTransformer::new(),
            window,
            sign,
            mid,
            positions: 0,
        }
    }

    /// Feed the next bar and return the estimate at its position (`NaN` when undefined).
    pub fn push(&mut self, bar: &Bar) -> Result<f64, EdgeError> {
        let log_bar = LogBar::new(bar, self.mid, None)?;
        Ok(self.push_log(log_bar))
    }

    /// Like [`EdgeEngine::push`], with a supplied mid-price for [`MidPrice::Supplied`].
    pub fn push_with_mid(&mut self, bar: &Bar, mid: f64) -> Result<f64, EdgeError> {
        let log_bar = LogBar::new(bar, self.mid, Some(mid))?;
        Ok(self.push_log(log_bar))
    }

    pub fn push_log(&mut self, bar: LogBar) -> f64 {
        let features = self
            .transformer
            .push(bar)
            .map_or_else(FeatureVector::missing, |rec| FeatureVector::from_record(&rec));
        let means = self.window.push(features);
        self.positions += 1;
        let s = estimate(&means, self.sign);
        if s.is_nan() {
            tracing::trace!(
                position = self.positions - 1,
                informative = means.informative(),
                "spread undefined at position"
            );
        }
        s
    }

    /// Bars pushed so far.
    pub fn positions(&self) -> usize {
        self.positions
    }

    pub fn reset(&mut self) {
        self.transformer.reset();
        self.window.reset();
        self.positions = 0;
    }
}

/// Rolling estimates, one per emitted position (`ceil(n / step)` values).
pub fn edge_rolling(series: &PriceSeries, cfg: &RollingConfig) -> Result<Vec<f64>, EdgeError> {
    let mut engine = EdgeEngine::rolling(cfg)?;
    let bars = log_bars(series, cfg.mid)?;

    let mut out = Vec::with_capacity(bars.len().div_ceil(cfg.step));
    for (t, bar) in bars.into_iter().enumerate() {
        let s = engine.push_log(bar);
        if t % cfg.step == 0 {
            out.push(s);
        }
    }

    tracing::debug!(
        bars = series.len(),
        window = cfg.window,
        min_periods = cfg.effective_min_periods(),
        step = cfg.step,
        missing = out.iter().filter(|s| s.is_nan()).count(),
        "rolling spread estimates computed"
    );
    Ok(out)
}

/// Expanding estimates, one per bar.
///
/// Equal to [`edge_rolling`] with `window = t + 1` at each position `t` as long
/// as both configs carry the same `min_periods`. See [`ExpandingConfig`].
pub fn edge_expanding(
    series: &PriceSeries,
    cfg: &ExpandingConfig,
) -> Result<Vec<f64>, EdgeError> {
    let mut engine = EdgeEngine::expanding(cfg)?;
    let out: Vec<f64> = log_bars(series, cfg.mid)?
        .into_iter()
        .map(|bar| engine.push_log(bar))
        .collect();

    tracing::debug!(
        bars = series.len(),
        min_periods = cfg.min_periods,
        missing = out.iter().filter(|s| s.is_nan()).count(),
        "expanding spread estimates computed"
    );
    Ok(out)
}
