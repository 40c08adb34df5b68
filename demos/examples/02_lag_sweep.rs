use kimchi::{Analyzer, FlowMetric};
use kimchi_demos::common::load_inputs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = Analyzer::builder().max_lag(12).build()?;
    let (inputs, flows) = load_inputs(&analyzer.config().assets)?;
    let premiums = analyzer.premiums(&inputs)?;
    let report = analyzer.correlate(&flows, &premiums.table)?;

    println!("zero-lag correlations:");
    for row in &report.summary {
        println!(
            "  {:<5} {:<9} r={:+.4} p={:.4} {}",
            row.asset,
            row.metric,
            row.correlation,
            row.p_value,
            row.significance().stars()
        );
    }

    if let Some(pair) = report.profile("BTC", FlowMetric::NetFlow) {
        println!("\nBTC premium vs net flow:");
        for row in pair.profile.to_rows() {
            let bar = "#".repeat((row.correlation.abs() * 40.0).round() as usize);
            println!("  {:>4}h {:+.3} {bar}", row.lag, row.correlation);
        }
    }

    println!("\nbest lags:");
    for line in report.interpretations() {
        println!("  {line}");
    }
    Ok(())
}
