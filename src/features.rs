//! Per-bar feature terms.
//!
//! Every monomial in returns and indicators that the estimator's expectations
//! and variances need is expanded here as its own slot. Windowed means of
//! these slots are sufficient statistics: [`crate::reconstruct`] rebuilds the
//! estimate from them without revisiting any bar.

use std::ops::{Index, IndexMut};

use crate::transform::TransformedRecord;

pub const FEATURE_COUNT: usize = 34;

/// Named slot of a [`FeatureVector`]. `tau` is idempotent (`tau^2 = tau`),
/// which is why no term carries it squared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureTerm {
    R1R2,
    R3R4,
    R1R5,
    R4R5,
    Tau,
    R1,
    TauR2,
    R3,
    TauR4,
    R5,
    R1R2Sq,
    R3R4Sq,
    R1R5Sq,
    R4R5Sq,
    R1R2R3R4,
    R1R4R5Sq,
    TauR2Sq,
    TauR4Sq,
    TauR5Sq,
    TauR1R2Sq,
    TauR3R4Sq,
    TauR1R5Sq,
    TauR4SqR5,
    TauR1R2R4,
    TauR2R3R4,
    TauR2R4,
    TauR1R4R5,
    TauR4R5Sq,
    TauR4R5,
    TauR5,
    Phi1,
    Phi2,
    Phi3,
    Phi4,
}

impl FeatureTerm {
    pub const ALL: [FeatureTerm; FEATURE_COUNT] = [
        FeatureTerm::R1R2,
        FeatureTerm::R3R4,
        FeatureTerm::R1R5,
        FeatureTerm::R4R5,
        FeatureTerm::Tau,
        FeatureTerm::R1,
        FeatureTerm::TauR2,
        FeatureTerm::R3,
        FeatureTerm::TauR4,
        FeatureTerm::R5,
        FeatureTerm::R1R2Sq,
        FeatureTerm::R3R4Sq,
        FeatureTerm::R1R5Sq,
        FeatureTerm::R4R5Sq,
        FeatureTerm::R1R2R3R4,
        FeatureTerm::R1R4R5Sq,
        FeatureTerm::TauR2Sq,
        FeatureTerm::TauR4Sq,
        FeatureTerm::TauR5Sq,
        FeatureTerm::TauR1R2Sq,
        FeatureTerm::TauR3R4Sq,
        FeatureTerm::TauR1R5Sq,
        FeatureTerm::TauR4SqR5,
        FeatureTerm::TauR1R2R4,
        FeatureTerm::TauR2R3R4,
        FeatureTerm::TauR2R4,
        FeatureTerm::TauR1R4R5,
        FeatureTerm::TauR4R5Sq,
        FeatureTerm::TauR4R5,
        FeatureTerm::TauR5,
        FeatureTerm::Phi1,
        FeatureTerm::Phi2,
        FeatureTerm::Phi3,
        FeatureTerm::Phi4,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FeatureTerm::R1R2 => "r1*r2",
            FeatureTerm::R3R4 => "r3*r4",
            FeatureTerm::R1R5 => "r1*r5",
            FeatureTerm::R4R5 => "r4*r5",
            FeatureTerm::Tau => "tau",
            FeatureTerm::R1 => "r1",
            FeatureTerm::TauR2 => "tau*r2",
            FeatureTerm::R3 => "r3",
            FeatureTerm::TauR4 => "tau*r4",
            FeatureTerm::R5 => "r5",
            FeatureTerm::R1R2Sq => "(r1*r2)^2",
            FeatureTerm::R3R4Sq => "(r3*r4)^2",
            FeatureTerm::R1R5Sq => "(r1*r5)^2",
            FeatureTerm::R4R5Sq => "(r4*r5)^2",
            FeatureTerm::R1R2R3R4 => "r1*r2*r3*r4",
            FeatureTerm::R1R4R5Sq => "r1*r4*r5^2",
            FeatureTerm::TauR2Sq => "tau*r2^2",
            FeatureTerm::TauR4Sq => "tau*r4^2",
            FeatureTerm::TauR5Sq => "tau*r5^2",
            FeatureTerm::TauR1R2Sq => "tau*r1*r2^2",
            FeatureTerm::TauR3R4Sq => "tau*r3*r4^2",
            FeatureTerm::TauR1R5Sq => "tau*r1*r5^2",
            FeatureTerm::TauR4SqR5 => "tau*r4^2*r5",
            FeatureTerm::TauR1R2R4 => "tau*r1*r2*r4",
            FeatureTerm::TauR2R3R4 => "tau*r2*r3*r4",
            FeatureTerm::TauR2R4 => "tau*r2*r4",
            FeatureTerm::TauR1R4R5 => "tau*r1*r4*r5",
            FeatureTerm::TauR4R5Sq => "tau*r4*r5^2",
            FeatureTerm::TauR4R5 => "tau*r4*r5",
            FeatureTerm::TauR5 => "tau*r5",
            FeatureTerm::Phi1 => "phi1",
            FeatureTerm::Phi2 => "phi2",
            FeatureTerm::Phi3 => "phi3",
            FeatureTerm::Phi4 => "phi4",
        }
    }
}

/// Fixed-width vector of feature terms for one bar. `NaN` marks a term
/// that is missing for this bar; other terms of the same bar are unaffected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Every term missing, as for the first bar of a series.
    pub fn missing() -> Self {
        Self([f64::NAN; FEATURE_COUNT])
    }

    pub fn from_record(rec: &TransformedRecord) -> Self {
        let TransformedRecord {
            r1,
            r2,
            r3,
            r4,
            r5,
            tau,
            ..
        } = *rec;

        let r12 = r1 * r2;
        let r15 = r1 * r5;
        let r34 = r3 * r4;
        let r45 = r4 * r5;
        let tr1 = tau * r1;
        let tr2 = tau * r2;
        let tr4 = tau * r4;
        let tr5 = tau * r5;

        let mut v = [0.0; FEATURE_COUNT];
        let mut set = |term: FeatureTerm, value: f64| v[term.index()] = value;
        set(FeatureTerm::R1R2, r12);
        set(FeatureTerm::R3R4, r34);
        set(FeatureTerm::R1R5, r15);
        set(FeatureTerm::R4R5, r45);
        set(FeatureTerm::Tau, tau);
        set(FeatureTerm::R1, r1);
        set(FeatureTerm::TauR2, tr2);
        set(FeatureTerm::R3, r3);
        set(FeatureTerm::TauR4, tr4);
        set(FeatureTerm::R5, r5);
        set(FeatureTerm::R1R2Sq, r12 * r12);
        set(FeatureTerm::R3R4Sq, r34 * r34);
        set(FeatureTerm::R1R5Sq, r15 * r15);
        set(FeatureTerm::R4R5Sq, r45 * r45);
        set(FeatureTerm::R1R2R3R4, r12 * r34);
        set(FeatureTerm::R1R4R5Sq, r15 * r45);
        set(FeatureTerm::TauR2Sq, tr2 * r2);
        set(FeatureTerm::TauR4Sq, tr4 * r4);
        set(FeatureTerm::TauR5Sq, tr5 * r5);
        set(FeatureTerm::TauR1R2Sq, tr2 * r12);
        set(FeatureTerm::TauR3R4Sq, tr4 * r34);
        set(FeatureTerm::TauR1R5Sq, tr5 * r15);
        set(FeatureTerm::TauR4SqR5, tr4 * r45);
        set(FeatureTerm::TauR1R2R4, tr4 * r12);
        set(FeatureTerm::TauR2R3R4, tr2 * r34);
        set(FeatureTerm::TauR2R4, tr2 * r4);
        set(FeatureTerm::TauR1R4R5, tr1 * r45);
        set(FeatureTerm::TauR4R5Sq, tr5 * r45);
        set(FeatureTerm::TauR4R5, tr4 * r5);
        set(FeatureTerm::TauR5, tr5);
        set(FeatureTerm::Phi1, rec.phi1);
        set(FeatureTerm::Phi2, rec.phi2);
        set(FeatureTerm::Phi3, rec.phi3);
        set(FeatureTerm::Phi4, rec.phi4);
        Self(v)
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn is_missing(&self, term: FeatureTerm) -> bool {
        self.0[term.index()].is_nan()
    }
}

impl Index<FeatureTerm> for FeatureVector {
    type Output = f64;

    fn index(&self, term: FeatureTerm) -> &f64 {
        &self.0[term.index()]
    }
}

impl IndexMut<FeatureTerm> for FeatureVector {
    fn index_mut(&mut self, term: FeatureTerm) -> &mut f64 {
        &mut self.0[term.index()]
    }
}
