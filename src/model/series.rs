use std::ops::Range;

use crate::error::EdgeError;
use crate::model::bar::Bar;

/// Four equal-length price sequences ordered by time, plus an optional
/// supplied mid-price sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    mid: Option<Vec<f64>>,
}

impl PriceSeries {
    pub fn new(
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    ) -> Result<Self, EdgeError> {
        let n = open.len();
        if high.len() != n || low.len() != n || close.len() != n {
            return Err(EdgeError::LengthMismatch {
                open: n,
                high: high.len(),
                low: low.len(),
                close: close.len(),
            });
        }
        Ok(Self {
            open,
            high,
            low,
            close,
            mid: None,
        })
    }

    pub fn from_slices(
        open: &[f64],
        high: &[f64],
        low: &[f64],
        close: &[f64],
    ) -> Result<Self, EdgeError> {
        Self::new(open.to_vec(), high.to_vec(), low.to_vec(), close.to_vec())
    }

    pub fn from_bars(bars: &[Bar]) -> Self {
        Self {
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: bars.iter().map(|b| b.close).collect(),
            mid: None,
        }
    }

    /// Attach a precomputed mid-price sequence, used with [`crate::MidPrice::Supplied`].
    pub fn with_mid(mut self, mid: Vec<f64>) -> Result<Self, EdgeError> {
        if mid.len() != self.len() {
            return Err(EdgeError::MidLengthMismatch {
                mid: mid.len(),
                expected: self.len(),
            });
        }
        self.mid = Some(mid);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn open(&self) -> &[f64] {
        &self.open
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn mid(&self) -> Option<&[f64]> {
        self.mid.as_deref()
    }

    pub fn bar(&self, i: usize) -> Option<Bar> {
        if i >= self.len() {
            return None;
        }
        Some(Bar::new(
            self.open[i],
            self.high[i],
            self.low[i],
            self.close[i],
        ))
    }

    pub fn bars(&self) -> impl Iterator<Item = Bar> + '_ {
        (0..self.len()).map(move |i| {
            Bar::new(self.open[i], self.high[i], self.low[i], self.close[i])
        })
    }

    /// Copy of the bars in `range`, clamped to the series bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        Self {
            open: self.open[start..end].to_vec(),
            high: self.high[start..end].to_vec(),
            low: self.low[start..end].to_vec(),
            close: self.close[start..end].to_vec(),
            mid: self.mid.as_ref().map(|m| m[start..end].to_vec()),
        }
    }
}
