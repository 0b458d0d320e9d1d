mod common;

use common::Lcg;
use edge_spread::features::{FeatureTerm, FeatureVector};
use edge_spread::window::{CompensatedSum, MomentWindow, WindowMode};

fn random_vector(rng: &mut Lcg) -> FeatureVector {
    let mut v = FeatureVector::missing();
    for term in FeatureTerm::ALL {
        v[term] = if rng.next_f64() < 0.1 {
            f64::NAN
        } else {
            (rng.next_f64() - 0.5) * 1e-3
        };
    }
    v[FeatureTerm::Tau] = if rng.next_f64() < 0.8 { 1.0 } else { 0.0 };
    v
}

fn naive_mean(values: &[f64]) -> (f64, usize) {
    let valid: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    if valid.is_empty() {
        return (f64::NAN, 0);
    }
    (valid.iter().sum::<f64>() / valid.len() as f64, valid.len())
}

#[test]
fn trailing_means_match_naive_recomputation() {
    let window = 10;
    let mut rng = Lcg::new(7);
    let mut w = MomentWindow::new(WindowMode::Trailing(window), 1).unwrap();
    let mut history: Vec<FeatureVector> = Vec::new();

    for i in 0..5_000 {
        let v = random_vector(&mut rng);
        history.push(v);
        let means = w.push(v);
        let start = history.len().saturating_sub(window);
        let slice = &history[start..];

        for term in FeatureTerm::ALL {
            let values: Vec<f64> = slice.iter().map(|v| v[term]).collect();
            let (expected, count) = naive_mean(&values);
            assert_eq!(means.count(term), count, "count drift at i={} {}", i, term.name());
            if expected.is_nan() {
                assert!(means.mean(term).is_nan());
            } else {
                assert!(
                    (means.mean(term) - expected).abs() < 1e-15,
                    "drift at i={} {}: window={} naive={}",
                    i,
                    term.name(),
                    means.mean(term),
                    expected
                );
            }
        }
        let informative = slice.iter().filter(|v| v[FeatureTerm::Tau] == 1.0).count();
        assert_eq!(means.informative(), informative);
        assert_eq!(w.len(), slice.len());
    }
}

#[test]
fn min_periods_gates_each_term() {
    let mut w = MomentWindow::new(WindowMode::Trailing(4), 3).unwrap();
    let mut v = FeatureVector::missing();
    v[FeatureTerm::R1] = 1.0;
    v[FeatureTerm::R3] = 1.0;
    w.push(v);
    w.push(v);
    v[FeatureTerm::R3] = f64::NAN;
    let means = w.push(v);
    assert!((means.mean(FeatureTerm::R1) - 1.0).abs() < f64::EPSILON);
    assert!(means.mean(FeatureTerm::R3).is_nan());
    assert_eq!(means.count(FeatureTerm::R3), 2);
}

#[test]
fn expanding_equals_trailing_window_that_never_fills() {
    let mut rng = Lcg::new(99);
    let mut expanding = MomentWindow::new(WindowMode::Expanding, 2).unwrap();
    let mut trailing = MomentWindow::new(WindowMode::Trailing(1_000), 2).unwrap();
    for _ in 0..500 {
        let v = random_vector(&mut rng);
        let a = expanding.push(v);
        let b = trailing.push(v);
        assert_eq!(a.informative(), b.informative());
        for term in FeatureTerm::ALL {
            assert_eq!(a.count(term), b.count(term));
            assert_eq!(a.mean(term).to_bits(), b.mean(term).to_bits(), "{}", term.name());
        }
    }
    assert_eq!(expanding.len(), 500);
}

#[test]
fn reset_clears_state() {
    let mut rng = Lcg::new(3);
    let mut w = MomentWindow::new(WindowMode::Trailing(5), 1).unwrap();
    for _ in 0..20 {
        w.push(random_vector(&mut rng));
    }
    w.reset();
    assert!(w.is_empty());
    let means = w.means();
    assert_eq!(means.informative(), 0);
    assert!(means.mean(FeatureTerm::R1).is_nan());
}

#[test]
fn compensated_sum_add_then_remove_returns_to_zero() {
    let mut rng = Lcg::new(11);
    let values: Vec<f64> = (0..1_000).map(|_| (rng.next_f64() - 0.5) * 1e6).collect();
    let mut s = CompensatedSum::new();
    for v in &values {
        s.add(*v);
    }
    for v in &values {
        s.remove(*v);
    }
    assert!(s.value().abs() < 1e-6);
}
