use chrono::{DateTime, Utc};
use kimchi_core::{FlowRecord, FlowSeries, KimchiError, SignedTransfer, aggregate_hourly, floor_hour};
use proptest::prelude::*;

fn arb_transfer() -> impl Strategy<Value = SignedTransfer> {
    (0i64..72 * 3_600, -1e6f64..1e6).prop_map(|(s, amount)| SignedTransfer {
        ts: DateTime::from_timestamp(1_700_000_000 + s, 0).unwrap(),
        amount,
    })
}

proptest! {
    #[test]
    fn records_satisfy_the_flow_invariant(transfers in proptest::collection::vec(arb_transfer(), 0..200)) {
        let flows = aggregate_hourly(transfers.clone());
        for r in flows.records() {
            prop_assert!(r.inflow >= 0.0 && r.outflow >= 0.0);
            prop_assert!(r.checked().is_ok());
            prop_assert_eq!(r.ts, floor_hour(r.ts));
        }
        prop_assert!(flows.records().windows(2).all(|w| w[0].ts < w[1].ts));

        let total: f64 = transfers.iter().map(|t| t.amount).sum();
        let net: f64 = flows.records().iter().map(|r| r.net_flow).sum();
        prop_assert!((total - net).abs() <= 1e-6 * transfers.iter().map(|t| t.amount.abs()).sum::<f64>().max(1.0));
    }

    #[test]
    fn only_active_hours_appear(transfers in proptest::collection::vec(arb_transfer(), 0..50)) {
        let hours: std::collections::BTreeSet<DateTime<Utc>> =
            transfers.iter().map(|t| floor_hour(t.ts)).collect();
        let flows = aggregate_hourly(transfers);
        prop_assert_eq!(flows.len(), hours.len());
    }
}

#[test]
fn duplicate_hours_are_rejected() {
    let ts = DateTime::from_timestamp(3_600, 0).unwrap();
    let err = FlowSeries::new([FlowRecord::new(ts, 1.0, 0.0), FlowRecord::new(ts, 2.0, 0.0)])
        .unwrap_err();
    assert!(matches!(err, KimchiError::DuplicateTimestamp { .. }));
}

#[test]
fn negative_sides_are_rejected() {
    let ts = DateTime::from_timestamp(0, 0).unwrap();
    let err = FlowSeries::new([FlowRecord::new(ts, -1.0, 0.0)]).unwrap_err();
    assert!(matches!(err, KimchiError::Data(_)));
}

#[test]
fn mid_hour_records_are_rejected() {
    let ts = DateTime::from_timestamp(5_400, 0).unwrap();
    let err = FlowSeries::new([FlowRecord::new(ts, 1.0, 0.0)]).unwrap_err();
    assert!(matches!(err, KimchiError::InvalidArg(_)));
}
