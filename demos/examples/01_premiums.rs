use kimchi::{Analyzer, AssetPremium, FxFill};
use kimchi_core::summary::describe;
use kimchi_demos::common::load_inputs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = Analyzer::builder()
        .fx_fill(FxFill::ForwardBackward)
        .build()?;
    let (inputs, _) = load_inputs(&analyzer.config().assets)?;

    let report = analyzer.premiums(&inputs)?;
    for outcome in &report.outcomes {
        match outcome {
            AssetPremium::Computed { asset, series } => {
                println!("{asset}: {} hourly premiums", series.len());
            }
            AssetPremium::Skipped(skip) => println!("{skip}"),
        }
    }

    let table = analyzer.with_moving_averages(&report.table)?;
    println!(
        "\n{:<22} {:>6} {:>9} {:>9} {:>9} {:>9}",
        "column", "count", "mean", "std", "min", "max"
    );
    for s in describe(&table) {
        let f = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
        println!(
            "{:<22} {:>6} {:>9} {:>9} {:>9} {:>9}",
            s.column,
            s.count,
            f(s.mean),
            f(s.std),
            f(s.min),
            f(s.max)
        );
    }
    Ok(())
}
