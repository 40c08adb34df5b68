use kimchi::Analyzer;
use kimchi_demos::common::load_inputs;
use tracing_subscriber::fmt::format::FmtSpan;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,kimchi=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();

    let analyzer = Analyzer::builder().max_lag(24).build()?;
    let (inputs, flows) = load_inputs(&analyzer.config().assets)?;
    let report = analyzer.run(&inputs, &flows)?;

    tracing::info!(status = ?report.status(), "{}", report.status_message());
    Ok(())
}
