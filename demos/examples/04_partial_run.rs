use kimchi::{Analyzer, RunStatus};
use kimchi_mock::MockMarket;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The reference venue has no ETH data: ETH is skipped, BTC and USDT go on.
    let market = MockMarket::new().omit("ETHUSDT");
    let analyzer = Analyzer::builder().max_lag(6).build()?;
    let report = analyzer.run(&market.premium_inputs(&analyzer.config().assets), &market.flows())?;

    println!("{}", report.status_message());
    if report.status() == RunStatus::Partial {
        for w in &report.warnings {
            println!("  warning: {w}");
        }
    }

    // Without FX rates nothing can be priced; the error carries its category.
    let market = MockMarket::new().omit(kimchi_mock::FX_SERIES);
    match analyzer.run(&market.premium_inputs(&analyzer.config().assets), &market.flows()) {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("failed ({:?}): {e}", e.kind()),
    }
    Ok(())
}
