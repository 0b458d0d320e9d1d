#![allow(dead_code)]

use edge_spread::model::bar::BarBuilder;
use edge_spread::{Bar, PriceSeries};

/// 64-bit linear congruential generator (Knuth's MMIX constants).
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Approximately standard normal (Irwin-Hall with 12 draws).
    pub fn normal(&mut self) -> f64 {
        let mut acc = 0.0;
        for _ in 0..12 {
            acc += self.next_f64();
        }
        acc - 6.0
    }
}

/// Bars built from trades at `eff * (1 +/- spread / 2)` around a log-normal
/// efficient price starting at 100.
pub fn simulate(n: usize, spread: f64, vol: f64, ticks: usize, seed: u64) -> PriceSeries {
    let mut rng = Lcg::new(seed);
    let mut eff = 100.0_f64;
    let mut bars = Vec::with_capacity(n);
    for _ in 0..n {
        let mut builder: Option<BarBuilder> = None;
        for _ in 0..ticks {
            eff *= (vol * rng.normal()).exp();
            let side = if rng.next_f64() < 0.5 { 1.0 } else { -1.0 };
            let price = eff * (1.0 + side * spread / 2.0);
            match builder.as_mut() {
                Some(b) => b.update(price),
                None => builder = Some(BarBuilder::new(price)),
            }
        }
        if let Some(b) = builder {
            bars.push(b.finish());
        }
    }
    PriceSeries::from_bars(&bars)
}

/// 500 bars with a 1% spread.
pub fn liquid_series() -> PriceSeries {
    simulate(500, 0.01, 0.001, 10, 42)
}

pub fn flat_series(n: usize, price: f64) -> PriceSeries {
    PriceSeries::from_bars(&vec![Bar::flat(price); n])
}

/// Equal within 1e-8 (absolute plus relative), or both missing.
pub fn assert_close(actual: f64, expected: f64, context: &str) {
    if expected.is_nan() {
        assert!(actual.is_nan(), "{}: expected NaN, got {}", context, actual);
        return;
    }
    assert!(
        (actual - expected).abs() <= 1e-8 + 1e-8 * expected.abs(),
        "{}: actual={} expected={}",
        context,
        actual,
        expected
    );
}
