use kimchi_core::{AnalysisConfig, FlowMetric, PremiumCalculator, lag_sweep};
use kimchi_mock::{FX_SERIES, HOT_WALLET, LEAD_HOURS, MARKETS, MockMarket};

#[test]
fn every_market_covers_every_hour() {
    let market = MockMarket::new().with_hours(48);
    for id in MARKETS {
        let candles = market.candles(id).unwrap();
        assert_eq!(candles.len(), 48, "{id}");
        assert_eq!(candles.first().map(|c| c.ts), Some(market.end()));
        assert_eq!(candles.last().map(|c| c.ts), Some(market.start()));
        assert!(candles.iter().all(|c| c.low <= c.close && c.close <= c.high));
    }
    assert_eq!(market.fx_rates().unwrap().len(), 48);
    assert!(market.candles("KRW-DOGE").is_none());
}

#[test]
fn data_is_deterministic() {
    let a = MockMarket::new().with_hours(24);
    let b = MockMarket::new().with_hours(24);
    assert_eq!(a.candles("KRW-BTC"), b.candles("KRW-BTC"));
    assert_eq!(a.transfers(), b.transfers());
}

#[test]
fn omitted_series_disappear() {
    let market = MockMarket::new().omit("ETHUSDT").omit(FX_SERIES);
    assert!(market.candles("ETHUSDT").is_none());
    assert!(market.fx_rates().is_none());
    let inputs = market.premium_inputs(&AnalysisConfig::default().assets);
    assert!(inputs.reference_series("ETHUSDT").is_none());
    assert!(inputs.reference_series("BTCUSDT").is_some());
    assert!(inputs.fx_rate_series().is_none());
}

#[test]
fn wallet_flows_have_one_record_per_hour() {
    let market = MockMarket::new().with_hours(72);
    let flows = market.flows();
    assert_eq!(flows.len(), 72);
    assert!(market.transfers().iter().any(|t| t.to == HOT_WALLET.to_ascii_uppercase()));
    for r in flows.records() {
        assert!(r.checked().is_ok());
        assert!(r.inflow >= 500.0);
    }
}

#[test]
fn net_flow_leads_btc_premium() {
    let market = MockMarket::new();
    let assets = AnalysisConfig::default().assets;
    let report = PremiumCalculator::new(assets.clone())
        .calculate(&market.premium_inputs(&assets))
        .unwrap();
    assert_eq!(report.skipped().count(), 0);

    let premium = report.table.column("BTC_premium").unwrap();
    let flow: Vec<Option<f64>> = market
        .flows()
        .records()
        .iter()
        .map(|r| Some(r.metric(FlowMetric::NetFlow)))
        .collect();
    let (lag, best) = lag_sweep(&flow, premium, 12).best();
    assert_eq!(lag, LEAD_HOURS as i32);
    assert!(best.coefficient > 0.9);
    assert!(best.p_value < 0.001);
}
