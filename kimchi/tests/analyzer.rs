use chrono::Duration;
use kimchi::{
    AnalysisConfig, AnalysisWindow, Analyzer, AssetSkip, ErrorKind, FlowMetric, KimchiError,
    LeadLag, RunStatus, Warning,
};
use kimchi_mock::{FX_SERIES, LEAD_HOURS, MockMarket};

fn analyzer() -> Analyzer {
    Analyzer::builder().max_lag(12).build().unwrap()
}

#[test]
fn detects_the_planted_lead() {
    let market = MockMarket::new();
    let analyzer = analyzer();
    let inputs = market.premium_inputs(&analyzer.config().assets);
    let report = analyzer.run(&inputs, &market.flows()).unwrap();

    assert_eq!(report.status(), RunStatus::Complete);
    assert!(report.warnings.is_empty());

    let best = report
        .correlation
        .best_lag("BTC", FlowMetric::NetFlow)
        .unwrap();
    assert_eq!(best.lag, LEAD_HOURS as i32);
    assert_eq!(best.lead_lag, LeadLag::DriverLeads(LEAD_HOURS as u32));
    assert!(best.correlation > 0.9);

    let profile = report.correlation.profile("BTC", FlowMetric::NetFlow).unwrap();
    assert_eq!(profile.profile.len(), 25);
    assert!(
        report
            .correlation
            .interpretations()
            .iter()
            .any(|l| l.starts_with("BTC / net_flow: net_flow leads BTC_premium by 3 hours"))
    );
}

#[test]
fn report_shapes_follow_the_configuration() {
    let market = MockMarket::new().with_hours(200);
    let analyzer = analyzer();
    let inputs = market.premium_inputs(&analyzer.config().assets);
    let report = analyzer.run(&inputs, &market.flows()).unwrap();

    // 3 assets x 3 metrics, asset-major
    let summary = &report.correlation.summary;
    assert_eq!(summary.len(), 9);
    let order: Vec<(&str, FlowMetric)> = summary.iter().map(|r| (r.asset.as_str(), r.metric)).collect();
    assert_eq!(order[0], ("BTC", FlowMetric::NetFlow));
    assert_eq!(order[2], ("BTC", FlowMetric::Outflow));
    assert_eq!(order[3], ("ETH", FlowMetric::NetFlow));
    assert_eq!(order[8], ("USDT", FlowMetric::Outflow));
    for (row, pair) in summary.iter().zip(&report.correlation.profiles) {
        assert_eq!(row.correlation, pair.profile.zero_lag().coefficient);
        assert_eq!(row.significant, row.p_value < 0.05);
    }

    let premium_columns: Vec<&str> = report.premiums.table.column_names().collect();
    assert_eq!(
        premium_columns,
        vec![
            "BTC_premium",
            "ETH_premium",
            "USDT_premium",
            "BTC_premium_ma24",
            "BTC_premium_ma168",
            "ETH_premium_ma24",
            "ETH_premium_ma168",
            "USDT_premium_ma24",
            "USDT_premium_ma168",
        ]
    );

    let stats: Vec<&str> = report
        .correlation
        .statistics
        .iter()
        .map(|s| s.column.as_str())
        .collect();
    assert_eq!(
        stats,
        vec!["net_flow", "inflow", "outflow", "BTC_premium", "ETH_premium", "USDT_premium"]
    );
    assert!(report.correlation.statistics.iter().all(|s| s.count == 200));
}

#[test]
fn missing_reference_is_a_partial_run() {
    let market = MockMarket::new().with_hours(100).omit("ETHUSDT");
    let analyzer = analyzer();
    let inputs = market.premium_inputs(&analyzer.config().assets);
    let report = analyzer.run(&inputs, &market.flows()).unwrap();

    assert_eq!(report.status(), RunStatus::Partial);
    assert_eq!(
        report.warnings,
        vec![Warning::AssetSkipped(AssetSkip::new(
            "ETH",
            "missing reference price series"
        ))]
    );
    assert!(report.status_message().starts_with("partial: 2 assets, 6 pairs; ETH skipped"));
    assert!(report.correlation.best_lag("ETH", FlowMetric::NetFlow).is_none());
}

#[test]
fn no_fx_rates_is_fatal() {
    let market = MockMarket::new().with_hours(24).omit(FX_SERIES);
    let analyzer = analyzer();
    let inputs = market.premium_inputs(&analyzer.config().assets);
    let err = analyzer.run(&inputs, &market.flows()).unwrap_err();
    assert_eq!(err, KimchiError::NoPremiumData);
    assert_eq!(err.kind(), ErrorKind::PartialCoverage);
}

#[test]
fn disjoint_flows_are_an_empty_input() {
    let market = MockMarket::new().with_hours(24);
    let later = MockMarket::new().with_hours(24 * 30);
    let analyzer = analyzer();
    let premiums = analyzer
        .premiums(&market.premium_inputs(&analyzer.config().assets))
        .unwrap();
    let flows = later.flows().clip(&AnalysisWindow {
        start: market.end() + Duration::hours(1),
        end: later.end(),
    });
    let err = analyzer.correlate(&flows, &premiums.table).unwrap_err();
    assert!(matches!(err, KimchiError::EmptyInput { .. }));
}

#[test]
fn window_clips_every_input() {
    let market = MockMarket::new();
    let window = AnalysisWindow {
        start: market.start() + Duration::hours(24),
        end: market.start() + Duration::hours(24 + 71),
    };
    let analyzer = Analyzer::builder()
        .max_lag(6)
        .window(window)
        .build()
        .unwrap();
    let inputs = market.premium_inputs(&analyzer.config().assets);
    let report = analyzer.run(&inputs, &market.flows()).unwrap();
    assert_eq!(report.premiums.table.len(), 72);
    assert_eq!(report.correlation.merged.len(), 72);
    assert_eq!(report.correlation.merged.index().first(), Some(&window.start));
    assert_eq!(report.correlation.merged.index().last(), Some(&window.end));
}

#[test]
fn metric_subset_limits_the_pairs() {
    let market = MockMarket::new().with_hours(96);
    let analyzer = Analyzer::builder()
        .config(AnalysisConfig {
            max_lag: 4,
            ..AnalysisConfig::default()
        })
        .flow_metrics(&[FlowMetric::Inflow])
        .ma_windows(&[])
        .build()
        .unwrap();
    let inputs = market.premium_inputs(&analyzer.config().assets);
    let report = analyzer.run(&inputs, &market.flows()).unwrap();
    assert_eq!(report.correlation.summary.len(), 3);
    assert!(report.correlation.summary.iter().all(|r| r.metric == FlowMetric::Inflow));
    assert_eq!(report.premiums.table.width(), 3);
}
