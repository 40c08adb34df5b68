//! Deterministic pseudo-random signal shared by the price and wallet fixtures.

/// Hours by which the hot-wallet net flow leads the BTC premium.
pub const LEAD_HOURS: usize = 3;

fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Uniform value in `[-1, 1)` for `(stream, hour)`.
pub fn unit(stream: u64, hour: usize) -> f64 {
    let bits = mix(stream.wrapping_mul(0x1_0000_0001) ^ hour as u64) >> 11;
    (bits as f64 / (1u64 << 53) as f64).mul_add(2.0, -1.0)
}

/// Hourly net flow of the hot wallet, in tokens.
pub fn net_flow(hour: usize) -> f64 {
    (unit(1, hour) * 400.0).round()
}

/// BTC premium in percent; tracks the net flow `LEAD_HOURS` earlier.
pub fn btc_premium(hour: usize) -> f64 {
    let driven = hour
        .checked_sub(LEAD_HOURS)
        .map_or(0.0, |h| net_flow(h) * 0.004);
    3.0 + driven + unit(2, hour) * 0.05
}

/// ETH premium in percent; unrelated to wallet flows.
pub fn eth_premium(hour: usize) -> f64 {
    2.5 + unit(3, hour) * 0.8
}

/// USDT premium in percent; unrelated to wallet flows.
pub fn usdt_premium(hour: usize) -> f64 {
    0.6 + unit(4, hour) * 0.3
}
