/// One period's open, high, low and close prices.
///
/// `high >= {open, low, close}` is expected but not enforced: the estimator
/// works on log-prices whatever their ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }

    /// A bar whose four prices are all the same.
    pub fn flat(price: f64) -> Self {
        Self::new(price, price, price, price)
    }

    /// All four prices strictly positive and finite, i.e. every log-price is defined.
    pub fn is_valid(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }
}

/// Aggregates a stream of trade prices into a single bar.
#[derive(Debug, Clone)]
pub struct BarBuilder {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    trades: usize,
}

impl BarBuilder {
    /// Start a new bar at the first trade price.
    pub fn new(price: f64) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
            trades: 1,
        }
    }

    /// Update the bar with a new trade price.
    pub fn update(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
        self.trades += 1;
    }

    pub fn trades(&self) -> usize {
        self.trades
    }

    /// Finalize into an immutable Bar.
    pub fn finish(&self) -> Bar {
        Bar::new(self.open, self.high, self.low, self.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_builder_basics() {
        let mut bb = BarBuilder::new(100.0);
        bb.update(105.0);
        bb.update(95.0);
        bb.update(102.0);
        assert_eq!(bb.trades(), 4);

        let bar = bb.finish();
        assert!((bar.open - 100.0).abs() < f64::EPSILON);
        assert!((bar.high - 105.0).abs() < f64::EPSILON);
        assert!((bar.low - 95.0).abs() < f64::EPSILON);
        assert!((bar.close - 102.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validity_rejects_non_positive_and_non_finite() {
        assert!(Bar::flat(17.61).is_valid());
        assert!(!Bar::new(0.0, 1.0, 1.0, 1.0).is_valid());
        assert!(!Bar::new(1.0, f64::NAN, 1.0, 1.0).is_valid());
        assert!(!Bar::new(1.0, 1.0, -2.0, 1.0).is_valid());
        assert!(!Bar::new(1.0, 1.0, 1.0, f64::INFINITY).is_valid());
    }
}
