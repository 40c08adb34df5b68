use chrono::{DateTime, Utc};
use kimchi_core::Candle;

use super::signal::{btc_premium, eth_premium, unit, usdt_premium};

pub fn fx_rate(hour: usize) -> f64 {
    let t = hour as f64;
    1_300.0 + 12.0 * (t / 36.0).sin() + unit(10, hour)
}

fn btc_usd(hour: usize) -> f64 {
    let t = hour as f64;
    60_000.0 + 900.0 * (t / 20.0).sin() + 40.0 * unit(11, hour)
}

fn eth_usd(hour: usize) -> f64 {
    let t = hour as f64;
    3_000.0 + 60.0 * (t / 15.0).cos() + 4.0 * unit(12, hour)
}

/// KRW price that yields `premium` over `usd` at `fx`.
fn domestic_krw(usd: f64, premium: f64, fx: f64) -> f64 {
    usd * (1.0 + premium / 100.0) * fx
}

/// Close price of `market` at `hour`, or `None` for an unknown market.
pub fn close(market: &str, hour: usize) -> Option<f64> {
    let fx = fx_rate(hour);
    Some(match market {
        "BTCUSDT" => btc_usd(hour),
        "ETHUSDT" => eth_usd(hour),
        "KRW-BTC" => domestic_krw(btc_usd(hour), btc_premium(hour), fx),
        "KRW-ETH" => domestic_krw(eth_usd(hour), eth_premium(hour), fx),
        "KRW-USDT" => domestic_krw(1.0, usdt_premium(hour), fx),
        _ => return None,
    })
}

pub fn candle(ts: DateTime<Utc>, close: f64, hour: usize) -> Candle {
    let swing = 0.001 + 0.001 * unit(20, hour).abs();
    Candle {
        ts,
        open: close * (1.0 - swing / 2.0),
        high: close * (1.0 + swing),
        low: close * (1.0 - swing),
        close,
        volume: 10.0 + 5.0 * unit(21, hour).abs(),
    }
}
