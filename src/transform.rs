use serde::Deserialize;

use crate::error::EdgeError;
use crate::model::bar::Bar;
use crate::model::series::PriceSeries;

/// Which combination of log-prices stands in for the mid-price of a bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MidPrice {
    /// (high + low) / 2
    #[default]
    HighLow,
    /// (open + close) / 2
    OpenClose,
    /// (high + low + close) / 3
    HighLowClose,
    /// (open + high + low) / 3
    OpenHighLow,
    /// (open + high + low + close) / 4
    OpenHighLowClose,
    /// Taken from a precomputed sequence attached to the series.
    Supplied,
}

impl MidPrice {
    fn combine(self, o: f64, h: f64, l: f64, c: f64) -> Option<f64> {
        match self {
            MidPrice::HighLow => Some((h + l) / 2.0),
            MidPrice::OpenClose => Some((o + c) / 2.0),
            MidPrice::HighLowClose => Some((h + l + c) / 3.0),
            MidPrice::OpenHighLow => Some((o + h + l) / 3.0),
            MidPrice::OpenHighLowClose => Some((o + h + l + c) / 4.0),
            MidPrice::Supplied => None,
        }
    }
}

/// Natural log of a price; `NaN` when the price is not positive and finite.
pub fn log_price(price: f64) -> f64 {
    if price.is_finite() && price > 0.0 {
        price.ln()
    } else {
        f64::NAN
    }
}

/// Log-prices of one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogBar {
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
    pub m: f64,
}

impl LogBar {
    /// `supplied_mid` is a raw price and is only read for [`MidPrice::Supplied`].
    pub fn new(bar: &Bar, rule: MidPrice, supplied_mid: Option<f64>) -> Result<Self, EdgeError> {
        let o = log_price(bar.open);
        let h = log_price(bar.high);
        let l = log_price(bar.low);
        let c = log_price(bar.close);
        let m = match rule.combine(o, h, l, c) {
            Some(m) => m,
            None => log_price(supplied_mid.ok_or(EdgeError::MissingMidPrice)?),
        };
        Ok(Self { o, h, l, c, m })
    }
}

/// Log-prices of every bar in `series` under the given mid-price rule.
pub fn log_bars(series: &PriceSeries, rule: MidPrice) -> Result<Vec<LogBar>, EdgeError> {
    let mid = match rule {
        MidPrice::Supplied => Some(series.mid().ok_or(EdgeError::MissingMidPrice)?),
        _ => None,
    };
    series
        .bars()
        .enumerate()
        .map(|(i, bar)| LogBar::new(&bar, rule, mid.map(|m| m[i])))
        .collect()
}

fn indicator(defined: bool, cond: bool) -> f64 {
    match (defined, cond) {
        (false, _) => f64::NAN,
        (true, true) => 1.0,
        (true, false) => 0.0,
    }
}

/// One bar's log-prices, its predecessor's, and the return terms and
/// indicators derived from the pair. Missing inputs propagate as `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformedRecord {
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
    pub m: f64,
    pub h1: f64,
    pub l1: f64,
    pub c1: f64,
    pub m1: f64,
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
    pub r4: f64,
    pub r5: f64,
    /// The period carries information: `h != l` or `l != c1`.
    pub tau: f64,
    /// `tau` and `o != h`
    pub phi1: f64,
    /// `tau` and `o != l`
    pub phi2: f64,
    /// `tau` and `c1 != h1`
    pub phi3: f64,
    /// `tau` and `c1 != l1`
    pub phi4: f64,
}

impl TransformedRecord {
    pub fn new(prev: &LogBar, cur: &LogBar) -> Self {
        let LogBar { o, h, l, c, m } = *cur;
        let LogBar {
            h: h1,
            l: l1,
            c: c1,
            m: m1,
            ..
        } = *prev;

        let tau = indicator(
            !(h.is_nan() || l.is_nan() || c1.is_nan()),
            h != l || l != c1,
        );
        let informative = tau == 1.0;
        let phi = |a: f64, b: f64| {
            indicator(!(tau.is_nan() || a.is_nan() || b.is_nan()), informative && a != b)
        };

        Self {
            o,
            h,
            l,
            c,
            m,
            h1,
            l1,
            c1,
            m1,
            r1: m - o,
            r2: o - m1,
            r3: m - c1,
            r4: c1 - m1,
            r5: o - c1,
            tau,
            phi1: phi(o, h),
            phi2: phi(o, l),
            phi3: phi(c1, h1),
            phi4: phi(c1, l1),
        }
    }
}

/// Streaming form of [`transform`]: remembers the previous bar only.
#[derive(Debug, Clone, Default)]
pub struct PriceTransformer {
    prev: Option<LogBar>,
}

impl PriceTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` for the first bar, which only serves as context.
    pub fn push(&mut self, bar: LogBar) -> Option<TransformedRecord> {
        let record = self.prev.map(|prev| TransformedRecord::new(&prev, &bar));
        self.prev = Some(bar);
        record
    }

    pub fn reset(&mut self) {
        self.prev = None;
    }
}

/// Transformed records for `series`, one shorter than the series itself.
pub fn transform(series: &PriceSeries, rule: MidPrice) -> Result<Vec<TransformedRecord>, EdgeError> {
    let bars = log_bars(series, rule)?;
    Ok(bars
        .windows(2)
        .map(|pair| TransformedRecord::new(&pair[0], &pair[1]))
        .collect())
}
