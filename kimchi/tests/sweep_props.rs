use kimchi::{Analyzer, FlowMetric};
use kimchi_mock::MockMarket;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn every_pair_gets_a_full_profile(hours in 2usize..120, max_lag in 0u32..30) {
        let market = MockMarket::new().with_hours(hours);
        let analyzer = Analyzer::builder().max_lag(max_lag).ma_windows(&[]).build().unwrap();
        let report = analyzer
            .run(&market.premium_inputs(&analyzer.config().assets), &market.flows())
            .unwrap();

        prop_assert_eq!(report.correlation.profiles.len(), 9);
        for (pair, best) in report.correlation.profiles.iter().zip(&report.correlation.best_lags) {
            prop_assert_eq!(pair.profile.len(), 2 * max_lag as usize + 1);
            prop_assert!(best.lag.unsigned_abs() <= max_lag);
            prop_assert!(best.correlation.abs() >= pair.profile.zero_lag().coefficient.abs());
        }
        let net = report.correlation.profile("BTC", FlowMetric::NetFlow).unwrap();
        prop_assert!(net.profile.iter().all(|(_, c)| (-1.0..=1.0).contains(&c.coefficient)));
    }
}
