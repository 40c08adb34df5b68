use std::path::Path;

use kimchi::{AssetConfig, FlowSeries, KimchiError, PremiumInputs, close_series, tabular};
use kimchi_mock::{FX_SERIES, MockMarket};

/// Premium inputs and wallet flows for the demos.
///
/// With `KIMCHI_DATA_DIR` set, reads `<market>.csv` candle files,
/// `usd_krw.csv` and `wallet_flow.csv` from that directory; otherwise serves
/// the deterministic mock market.
///
/// # Errors
/// Returns `Tabular` if a file in `KIMCHI_DATA_DIR` is missing or malformed.
pub fn load_inputs(assets: &[AssetConfig]) -> Result<(PremiumInputs, FlowSeries), KimchiError> {
    match std::env::var_os("KIMCHI_DATA_DIR") {
        Some(dir) => {
            println!("--- (Reading CSV inputs from {}) ---", dir.to_string_lossy());
            load_dir(Path::new(&dir), assets)
        }
        None => {
            let market = MockMarket::new();
            Ok((market.premium_inputs(assets), market.flows()))
        }
    }
}

fn open(path: &Path) -> Result<std::fs::File, KimchiError> {
    std::fs::File::open(path)
        .map_err(|e| KimchiError::Tabular(format!("{}: {e}", path.display())))
}

fn load_dir(dir: &Path, assets: &[AssetConfig]) -> Result<(PremiumInputs, FlowSeries), KimchiError> {
    let mut inputs = PremiumInputs::new();
    for asset in assets {
        let ids = std::iter::once(asset.domestic_market.as_str()).chain(asset.reference_symbol.as_deref());
        for id in ids {
            let path = dir.join(format!("{id}.csv"));
            if !path.exists() {
                // a missing market is reported as a skipped asset, not an error
                continue;
            }
            let series = close_series(id, tabular::read_candles(open(&path)?)?);
            inputs = if id == asset.domestic_market {
                inputs.domestic(id, series)
            } else {
                inputs.reference(id, series)
            };
        }
    }
    let fx = dir.join(format!("{FX_SERIES}.csv"));
    if fx.exists() {
        inputs = inputs.fx_rate(tabular::read_rates(open(&fx)?, FX_SERIES)?);
    }
    let flows = tabular::read_flows(open(&dir.join("wallet_flow.csv"))?)?;
    Ok((inputs, flows))
}
