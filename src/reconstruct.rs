use crate::features::FeatureTerm as T;
use crate::window::WindowedMeans;

/// Fewer informative (`tau = 1`) positions than this leaves the variance
/// decomposition unidentified.
pub const MIN_INFORMATIVE: usize = 2;

/// Probabilities, expectations and variances behind one spread estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadMoments {
    /// P[tau = 1]
    pub pt: f64,
    /// P[tau, o != h] + P[tau, o != l]
    pub po: f64,
    /// P[tau, c1 != h1] + P[tau, c1 != l1]
    pub pc: f64,
    pub e1: f64,
    pub e2: f64,
    pub v1: f64,
    pub v2: f64,
}

impl SpreadMoments {
    pub fn squared_spread(&self) -> f64 {
        combine(self.e1, self.e2, self.v1, self.v2)
    }

    pub fn spread(&self, sign: bool) -> f64 {
        signed_root(self.squared_spread(), sign)
    }
}

fn usable(p: f64) -> bool {
    p.is_finite() && p != 0.0
}

/// Probabilities of the window, or `None` when the window is too
/// uninformative to identify the estimator.
pub fn probabilities(
    informative: usize,
    pt: f64,
    po: f64,
    pc: f64,
) -> Option<(f64, f64, f64)> {
    if informative < MIN_INFORMATIVE || !usable(pt) || !usable(po) || !usable(pc) {
        return None;
    }
    Some((pt, po, pc))
}

/// Rebuild the estimator's moments from windowed feature means alone.
///
/// With `a1 = -4/po`, `a2 = -4/pc` and the tau-conditional means
/// `a3 = E[r1]/pt`, `a5 = E[r3]/pt`, `a6 = E[r5]/pt`, the composite variables are
/// `x1 = a1*(r1 - a3*tau)*r2 + a2*(r3 - a5*tau)*r4` and
/// `x2 = a1*(r1 - a3*tau)*r5 + a2*(r5 - a6*tau)*r4`. Expanding their first
/// and second moments gives only means of terms in [`crate::features`].
pub fn reconstruct(means: &WindowedMeans) -> Option<SpreadMoments> {
    let m = |term: T| means.mean(term);

    let (pt, po, pc) = probabilities(
        means.informative(),
        m(T::Tau),
        m(T::Phi1) + m(T::Phi2),
        m(T::Phi3) + m(T::Phi4),
    )?;

    let a1 = -4.0 / po;
    let a2 = -4.0 / pc;
    let a3 = m(T::R1) / pt;
    let a5 = m(T::R3) / pt;
    let a6 = m(T::R5) / pt;
    let a11 = a1 * a1;
    let a22 = a2 * a2;
    let a12 = 2.0 * a1 * a2;

    let e1 = a1 * (m(T::R1R2) - a3 * m(T::TauR2)) + a2 * (m(T::R3R4) - a5 * m(T::TauR4));
    let e2 = a1 * (m(T::R1R5) - a3 * m(T::TauR5)) + a2 * (m(T::R4R5) - a6 * m(T::TauR4));

    let v1 = a11 * (m(T::R1R2Sq) - 2.0 * a3 * m(T::TauR1R2Sq) + a3 * a3 * m(T::TauR2Sq))
        + a22 * (m(T::R3R4Sq) - 2.0 * a5 * m(T::TauR3R4Sq) + a5 * a5 * m(T::TauR4Sq))
        + a12
            * (m(T::R1R2R3R4) - a3 * m(T::TauR2R3R4) - a5 * m(T::TauR1R2R4)
                + a3 * a5 * m(T::TauR2R4))
        - e1 * e1;
    let v2 = a11 * (m(T::R1R5Sq) - 2.0 * a3 * m(T::TauR1R5Sq) + a3 * a3 * m(T::TauR5Sq))
        + a22 * (m(T::R4R5Sq) - 2.0 * a6 * m(T::TauR4SqR5) + a6 * a6 * m(T::TauR4Sq))
        + a12
            * (m(T::R1R4R5Sq) - a3 * m(T::TauR4R5Sq) - a6 * m(T::TauR1R4R5)
                + a3 * a6 * m(T::TauR4R5))
        - e2 * e2;

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

/// Spread estimate for one window, `NaN` when undefined.
pub fn estimate(means: &WindowedMeans, sign: bool) -> f64 {
    reconstruct(means).map_or(f64::NAN, |moments| moments.spread(sign))
}

/// Variances at or below machine epsilon are numerical noise.
pub fn floor_variance(v: f64) -> f64 {
    if v > f64::EPSILON {
        v
    } else {
        0.0
    }
}

/// Squared spread from the two moment conditions: variance-weighted when the
/// total variance is positive, otherwise the plain average of `e1` and `e2`.
pub fn combine(e1: f64, e2: f64, v1: f64, v2: f64) -> f64 {
    if e1.is_nan() || e2.is_nan() || v1.is_nan() || v2.is_nan() {
        return f64::NAN;
    }
    let v1 = floor_variance(v1);
    let v2 = floor_variance(v2);
    let vt = v1 + v2;
    if vt > 0.0 {
        (v2 * e1 + v1 * e2) / vt
    } else {
        (e1 + e2) / 2.0
    }
}

/// `sqrt(|s2|)`, negated in signed mode when `s2 < 0`.
pub fn signed_root(s2: f64, sign: bool) -> f64 {
    let s = s2.abs().sqrt();
    if sign && s2 < 0.0 {
        -s
    } else {
        s
    }
}
