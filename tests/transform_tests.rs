use edge_spread::transform::{log_bars, transform, LogBar, MidPrice, PriceTransformer};
use edge_spread::{Bar, EdgeError, PriceSeries};

fn series() -> PriceSeries {
    PriceSeries::from_bars(&[
        Bar::new(10.0, 11.0, 9.0, 10.5),
        Bar::new(10.5, 12.0, 10.0, 11.0),
        Bar::new(11.0, 11.0, 11.0, 11.0),
        Bar::new(11.0, 11.0, 11.0, 11.0),
    ])
}

#[test]
fn one_record_per_bar_after_the_first() {
    let records = transform(&series(), MidPrice::HighLow).unwrap();
    assert_eq!(records.len(), 3);
}

#[test]
fn returns_are_built_from_current_and_previous_log_prices() {
    let records = transform(&series(), MidPrice::HighLow).unwrap();
    let r = records[0];
    let m1 = (11f64.ln() + 9f64.ln()) / 2.0;
    let m = (12f64.ln() + 10f64.ln()) / 2.0;
    let o = 10.5f64.ln();
    let c1 = 10.5f64.ln();
    assert!((r.m1 - m1).abs() < 1e-15);
    assert!((r.r1 - (m - o)).abs() < 1e-15);
    assert!((r.r2 - (o - m1)).abs() < 1e-15);
    assert!((r.r3 - (m - c1)).abs() < 1e-15);
    assert!((r.r4 - (c1 - m1)).abs() < 1e-15);
    assert!((r.r5 - (o - c1)).abs() < 1e-15);
    assert_eq!(r.tau, 1.0);
    assert_eq!(r.phi1, 1.0);
    assert_eq!(r.phi2, 1.0);
    assert_eq!(r.phi3, 1.0);
    assert_eq!(r.phi4, 1.0);
}

#[test]
fn flat_bar_after_a_jump_is_informative_then_not() {
    let records = transform(&series(), MidPrice::HighLow).unwrap();
    // 11 -> flat 11: low equals previous close
    assert_eq!(records[1].tau, 0.0);
    assert_eq!(records[1].phi1, 0.0);
    assert_eq!(records[2].tau, 0.0);
    assert_eq!(records[2].phi4, 0.0);
}

#[test]
fn invalid_price_propagates_as_missing() {
    let s = PriceSeries::from_bars(&[
        Bar::new(10.0, 11.0, 9.0, 10.5),
        Bar::new(10.5, 12.0, 0.0, 11.0),
        Bar::new(11.0, 11.5, 10.5, 11.2),
    ]);
    let records = transform(&s, MidPrice::HighLow).unwrap();
    assert!(records[0].l.is_nan());
    assert!(records[0].m.is_nan());
    assert!(records[0].tau.is_nan());
    assert!(records[0].phi2.is_nan());
    // open and previous close are still defined
    assert!(!records[0].r5.is_nan());
    assert!(records[1].l1.is_nan());
    assert!(records[1].phi4.is_nan());
    assert!(!records[1].tau.is_nan());
}

#[test]
fn mid_price_rules() {
    let bar = Bar::new(2.0, 4.0, 1.0, 3.0);
    let (o, h, l, c) = (2f64.ln(), 4f64.ln(), 1f64.ln(), 3f64.ln());
    let cases = [
        (MidPrice::HighLow, (h + l) / 2.0),
        (MidPrice::OpenClose, (o + c) / 2.0),
        (MidPrice::HighLowClose, (h + l + c) / 3.0),
        (MidPrice::OpenHighLow, (o + h + l) / 3.0),
        (MidPrice::OpenHighLowClose, (o + h + l + c) / 4.0),
    ];
    for (rule, expected) in cases {
        let lb = LogBar::new(&bar, rule, None).unwrap();
        assert!((lb.m - expected).abs() < 1e-15, "{:?}", rule);
    }
}

#[test]
fn supplied_mid_is_read_from_the_series() {
    let s = series();
    assert_eq!(
        log_bars(&s, MidPrice::Supplied).unwrap_err(),
        EdgeError::MissingMidPrice
    );
    let s = s.with_mid(vec![10.0, 11.0, 11.0, 11.0]).unwrap();
    let bars = log_bars(&s, MidPrice::Supplied).unwrap();
    assert!((bars[1].m - 11f64.ln()).abs() < 1e-15);
}

#[test]
fn streaming_transformer_skips_first_bar() {
    let mut tr = PriceTransformer::new();
    let lb = LogBar::new(&Bar::flat(5.0), MidPrice::HighLow, None).unwrap();
    assert!(tr.push(lb).is_none());
    assert!(tr.push(lb).is_some());
    tr.reset();
    assert!(tr.push(lb).is_none());
}
