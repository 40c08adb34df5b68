use std::fs::File;

use kimchi::{Analyzer, tabular};
use kimchi_demos::common::load_inputs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = Analyzer::builder().max_lag(24).build()?;
    let (inputs, flows) = load_inputs(&analyzer.config().assets)?;
    let report = analyzer.run(&inputs, &flows)?;

    let dir = tempfile::tempdir()?;
    let premiums = dir.path().join("kimchi_premium.csv");
    tabular::write_table_to_path(&report.premiums.table, &premiums)?;
    tabular::write_rows(
        &report.correlation.summary,
        File::create(dir.path().join("correlation_summary.csv"))?,
    )?;
    for pair in &report.correlation.profiles {
        let name = format!("lag_{}_{}.csv", pair.asset, pair.metric);
        tabular::write_rows(&pair.profile.to_rows(), File::create(dir.path().join(name))?)?;
    }
    tabular::write_rows(
        &report.correlation.statistics,
        File::create(dir.path().join("statistics.csv"))?,
    )?;

    let reloaded = tabular::read_table_from_path(&premiums)?;
    assert_eq!(reloaded, report.premiums.table);

    let mut files: Vec<String> = std::fs::read_dir(dir.path())?
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    println!("wrote {} files to {}:", files.len(), dir.path().display());
    for f in files {
        println!("  {f}");
    }
    Ok(())
}
