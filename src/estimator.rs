//! Single-window estimator evaluated directly on a slice of bars.
//!
//! This is the closed form of Ardia, Guidotti & Kroencke (2024) computed from
//! explicit per-bar arrays. The rolling engine must agree with it on every
//! window.

use serde::Deserialize;

use crate::error::EdgeError;
use crate::model::series::PriceSeries;
use crate::reconstruct::{probabilities, SpreadMoments};
use crate::transform::{transform, MidPrice, TransformedRecord};

/// Fewer bars than this and the estimate is undefined.
pub const MIN_BARS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct EstimatorConfig {
    /// Return negative estimates instead of their magnitude.
    #[serde(default)]
    pub sign: bool,
    #[serde(default)]
    pub mid: MidPrice,
}

/// Spread estimate from raw price slices with the default (high+low)/2 mid-price.
///
/// A value of 0.01 is a 1% spread. Returns `NaN` when the data cannot
/// identify the spread and an error only for unequal input lengths.
pub fn edge(
    open: &[f64],
    high: &[f64],
    low: &[f64],
    close: &[f64],
    sign: bool,
) -> Result<f64, EdgeError> {
    let series = PriceSeries::from_slices(open, high, low, close)?;
    edge_series(
        &series,
        &EstimatorConfig {
            sign,
            ..EstimatorConfig::default()
        },
    )
}

pub fn edge_series(series: &PriceSeries, cfg: &EstimatorConfig) -> Result<f64, EdgeError> {
    if series.len() < MIN_BARS {
        return Ok(f64::NAN);
    }
    let records = transform(series, cfg.mid)?;
    Ok(edge_records(&records, cfg.sign))
}

fn nanmean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

fn mean_by(records: &[TransformedRecord], f: impl Fn(&TransformedRecord) -> f64) -> f64 {
    nanmean(records.iter().map(f))
}

/// Estimate over already transformed records (one per bar after the first).
pub fn edge_records(records: &[TransformedRecord], sign: bool) -> f64 {
    moments(records).map_or(f64::NAN, |m| m.spread(sign))
}

/// Probabilities, expectations and variances of the estimator, computed
/// from explicit per-record arrays.
pub fn moments(records: &[TransformedRecord]) -> Option<SpreadMoments> {
    if records.len() + 1 < MIN_BARS {
        return None;
    }

    let informative = records.iter().filter(|r| r.tau == 1.0).count();
    let pt = mean_by(records, |r| r.tau);
    let po = mean_by(records, |r| r.phi1) + mean_by(records, |r| r.phi2);
    let pc = mean_by(records, |r| r.phi3) + mean_by(records, |r| r.phi4);
    let Some((pt, po, pc)) = probabilities(informative, pt, po, pc) else {
        tracing::trace!(
            records = records.len(),
            informative,
            "single-window estimate undefined"
        );
        return None;
    };

    let m1 = mean_by(records, |r| r.r1);
    let m3 = mean_by(records, |r| r.r3);
    let m5 = mean_by(records, |r| r.r5);

    let (x1, x2): (Vec<f64>, Vec<f64>) = records
        .iter()
        .map(|r| {
            let d1 = r.r1 - r.tau * m1 / pt;
            let d3 = r.r3 - r.tau * m3 / pt;
            let d5 = r.r5 - r.tau * m5 / pt;
            (
                -4.0 / po * d1 * r.r2 - 4.0 / pc * d3 * r.r4,
                -4.0 / po * d1 * r.r5 - 4.0 / pc * d5 * r.r4,
            )
        })
        .unzip();

    let e1 = nanmean(x1.iter().copied());
    let e2 = nanmean(x2.iter().copied());
    let v1 = nanmean(x1.iter().map(|x| x * x)) - e1 * e1;
    let v2 = nanmean(x2.iter().map(|x| x * x)) - e2 * e2;

    Some(SpreadMoments {
        pt,
        po,
        pc,
        e1,
        e2,
        v1,
        v2,
    })
}
