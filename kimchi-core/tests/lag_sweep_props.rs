use kimchi_core::correlation::{Correlation, lag_sweep, pearson, select_best_lag};
use kimchi_core::{LagCorrelationProfile, LeadLag, PairProfile, FlowMetric};
use proptest::prelude::*;

fn arb_column(len: usize) -> impl Strategy<Value = Vec<Option<f64>>> {
    proptest::collection::vec(proptest::option::weighted(0.85, -1e3f64..1e3), len)
}

fn arb_pair() -> impl Strategy<Value = (Vec<Option<f64>>, Vec<Option<f64>>)> {
    (0usize..60).prop_flat_map(|n| (arb_column(n), arb_column(n)))
}

fn corr(r: f64) -> Correlation {
    Correlation {
        coefficient: r,
        p_value: 0.01,
    }
}

proptest! {
    #[test]
    fn constant_driver_is_neutral_at_every_lag(v in -1e4f64..1e4, y in arb_column(24), max_lag in 0u32..8) {
        let flat = vec![Some(v); y.len()];
        for (_, c) in lag_sweep(&flat, &y, max_lag).iter() {
            prop_assert_eq!(c, Correlation::NEUTRAL);
        }
    }

    #[test]
    fn lag_zero_is_plain_pearson((x, y) in arb_pair(), max_lag in 0u32..20) {
        let profile = lag_sweep(&x, &y, max_lag);
        prop_assert_eq!(profile.get(0), Some(pearson(&x, &y)));
        prop_assert_eq!(profile.zero_lag(), pearson(&x, &y));
    }

    #[test]
    fn keys_are_contiguous((x, y) in arb_pair(), max_lag in 0u32..30) {
        let profile = lag_sweep(&x, &y, max_lag);
        prop_assert_eq!(profile.len(), 2 * max_lag as usize + 1);
        let keys: Vec<i32> = profile.iter().map(|(lag, _)| lag).collect();
        let expected: Vec<i32> = (-(max_lag as i32)..=max_lag as i32).collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn values_are_bounded((x, y) in arb_pair()) {
        for (_, c) in lag_sweep(&x, &y, 10).iter() {
            prop_assert!((-1.0..=1.0).contains(&c.coefficient));
            prop_assert!((0.0..=1.0).contains(&c.p_value));
        }
    }

    #[test]
    fn swapping_inputs_mirrors_the_profile((x, y) in arb_pair()) {
        let forward = lag_sweep(&x, &y, 8);
        let backward = lag_sweep(&y, &x, 8);
        for (lag, c) in forward.iter() {
            prop_assert_eq!(Some(c), backward.get(-lag));
        }
    }
}

#[test]
fn single_overlap_is_the_exact_sentinel() {
    let x = [Some(1.0), None, Some(3.0)];
    let y = [None, Some(2.0), Some(5.0)];
    let c = pearson(&x, &y);
    assert_eq!(c.coefficient, 0.0);
    assert_eq!(c.p_value, 1.0);
}

#[test]
fn three_point_p_value_matches_closed_form() {
    // One degree of freedom: p = (2 / pi) * asin(sqrt(1 - r^2)).
    let x = [Some(1.0), Some(2.0), Some(3.0)];
    let y = [Some(1.0), Some(3.0), Some(2.0)];
    let c = pearson(&x, &y);
    assert!((c.coefficient - 0.5).abs() < 1e-12);
    let expected = 2.0 / std::f64::consts::PI * (1.0 - 0.25f64).sqrt().asin();
    assert!((c.p_value - expected).abs() < 1e-9);
}

#[test]
fn equal_magnitude_at_plus_and_minus_three_picks_minus_three() {
    let profile = LagCorrelationProfile::try_from_entries(
        (-3..=3).map(|lag: i32| (lag, if lag.abs() == 3 { corr(0.9 * lag.signum() as f64) } else { corr(0.2) })),
    )
    .unwrap();
    assert_eq!(profile.best().0, -3);
}

#[test]
fn closer_to_zero_wins_among_equal_magnitudes() {
    let best = select_best_lag([(-5, corr(-0.7)), (1, corr(0.7)), (4, corr(0.7))]).unwrap();
    assert_eq!(best.0, 1);
}

#[test]
fn best_lag_carries_interpretation() {
    let profile = LagCorrelationProfile::try_from_entries(
        (-2..=2).map(|lag| (lag, corr(if lag == 2 { 0.95 } else { 0.1 }))),
    )
    .unwrap();
    let pair = PairProfile {
        asset: "BTC".into(),
        metric: FlowMetric::NetFlow,
        profile,
    };
    let best = pair.best_lag();
    assert_eq!(best.lag, 2);
    assert_eq!(best.lead_lag, LeadLag::DriverLeads(2));
    assert_eq!(
        best.lead_lag.describe("net_flow", "BTC_premium"),
        "net_flow leads BTC_premium by 2 hours"
    );
    assert_eq!(pair.profile.to_rows().first().map(|r| r.lag), Some(-2));
}
