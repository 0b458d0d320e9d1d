//! Windowed means of feature terms, maintained incrementally.
//!
//! The trailing window keeps a ring buffer of the last `W` feature vectors so
//! the vector leaving the window can be subtracted; the expanding window only
//! ever adds. Both keep one compensated running sum and one valid-count per
//! term, so each push is O(1) in the window size.

use crate::error::EdgeError;
use crate::features::{FeatureTerm, FeatureVector, FEATURE_COUNT};

/// Neumaier-compensated running sum supporting removal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    pub fn remove(&mut self, value: f64) {
        self.add(-value);
    }

    pub fn value(&self) -> f64 {
        self.sum + self.compensation
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// The last `W` positions.
    Trailing(usize),
    /// Every position from the start of the series.
    Expanding,
}

/// Means of every feature term over the current window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedMeans {
    means: [f64; FEATURE_COUNT],
    counts: [usize; FEATURE_COUNT],
    informative: usize,
}

impl WindowedMeans {
    /// `NaN` when fewer than `min_periods` non-missing values contributed.
    pub fn mean(&self, term: FeatureTerm) -> f64 {
        self.means[term.index()]
    }

    pub fn count(&self, term: FeatureTerm) -> usize {
        self.counts[term.index()]
    }

    /// Number of positions in the window with `tau = 1`.
    pub fn informative(&self) -> usize {
        self.informative
    }
}

#[derive(Debug, Clone)]
pub struct MomentWindow {
    mode: WindowMode,
    min_periods: usize,
    buffer: Vec<FeatureVector>,
    head: usize,
    sums: [CompensatedSum; FEATURE_COUNT],
    counts: [usize; FEATURE_COUNT],
    informative: usize,
    len: usize,
}

impl MomentWindow {
    pub fn new(mode: WindowMode, min_periods: usize) -> Result<Self, EdgeError> {
        if min_periods == 0 {
            return Err(EdgeError::InvalidMinPeriods {
                min_periods,
                reason: "must be > 0".to_string(),
            });
        }
        let capacity = match mode {
            WindowMode::Trailing(0) => {
                return Err(EdgeError::InvalidWindow { window: 0, min: 1 });
            }
            WindowMode::Trailing(w) if min_periods > w => {
                return Err(EdgeError::InvalidMinPeriods {
                    min_periods,
                    reason: format!("must not exceed window {}", w),
                });
            }
            WindowMode::Trailing(w) => w,
            WindowMode::Expanding => 0,
        };
        Ok(Self {
            mode,
            min_periods,
            buffer: vec![FeatureVector::missing(); capacity],
            head: 0,
            sums: [CompensatedSum::default(); FEATURE_COUNT],
            counts: [0; FEATURE_COUNT],
            informative: 0,
            len: 0,
        })
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    pub fn min_periods(&self) -> usize {
        self.min_periods
    }

    /// Positions currently covered by the window, missing ones included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slide the window forward by one position and return the new means.
    pub fn push(&mut self, features: FeatureVector) -> WindowedMeans {
        match self.mode {
            WindowMode::Trailing(w) => {
                // The ring starts out filled with missing vectors, so evicting
                // before the window is full removes nothing.
                let leaving = std::mem::replace(&mut self.buffer[self.head], features);
                self.evict(&leaving);
                self.head = (self.head + 1) % w;
                self.len = (self.len + 1).min(w);
            }
            WindowMode::Expanding => {
                self.len += 1;
            }
        }
        self.admit(&features);
        self.means()
    }

    pub fn means(&self) -> WindowedMeans {
        let mut means = [f64::NAN; FEATURE_COUNT];
        for (i, mean) in means.iter_mut().enumerate() {
            let n = self.counts[i];
            if n > 0 && n >= self.min_periods {
                *mean = self.sums[i].value() / n as f64;
            }
        }
        WindowedMeans {
            means,
            counts: self.counts,
            informative: self.informative,
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(FeatureVector::missing());
        self.head = 0;
        self.sums = [CompensatedSum::default(); FEATURE_COUNT];
        self.counts = [0; FEATURE_COUNT];
        self.informative = 0;
        self.len = 0;
    }

    fn admit(&mut self, features: &FeatureVector) {
        for (i, &x) in features.as_array().iter().enumerate() {
            if !x.is_nan() {
                self.sums[i].add(x);
                self.counts[i] += 1;
            }
        }
        if features[FeatureTerm::Tau] == 1.0 {
            self.informative += 1;
        }
    }

    fn evict(&mut self, features: &FeatureVector) {
        for (i, &x) in features.as_array().iter().enumerate() {
            if x.is_nan() {
                continue;
            }
            self.counts[i] -= 1;
            if self.counts[i] == 0 {
                // Drop accumulated rounding residue once the term has no contributors.
                self.sums[i].reset();
            } else {
                self.sums[i].remove(x);
            }
        }
        if features[FeatureTerm::Tau] == 1.0 {
            self.informative -= 1;
        }
    }
}
