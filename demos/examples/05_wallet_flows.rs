use kimchi::aggregate_wallet_transfers;
use kimchi::AnalysisWindow;
use kimchi_mock::{HOT_WALLET, MockMarket};

fn main() {
    let market = MockMarket::new().with_hours(24);
    let transfers = market.transfers();
    let window = AnalysisWindow {
        start: market.start(),
        end: market.start() + chrono::Duration::hours(5),
    };
    let flows = aggregate_wallet_transfers(HOT_WALLET, &transfers, Some(&window));

    println!("{} transfers, {} hourly records in window", transfers.len(), flows.len());
    println!("{:<20} {:>10} {:>10} {:>10}", "hour", "net_flow", "inflow", "outflow");
    for r in flows.records() {
        println!(
            "{:<20} {:>10.0} {:>10.0} {:>10.0}",
            r.ts.format("%Y-%m-%d %H:%M"),
            r.net_flow,
            r.inflow,
            r.outflow
        );
    }
}
