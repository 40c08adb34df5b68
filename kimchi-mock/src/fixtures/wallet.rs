use chrono::{DateTime, Duration, Utc};
use kimchi_core::WalletTransfer;

use super::signal::{net_flow, unit};

pub const HOT_WALLET: &str = "TKimchiMockHotWallet000000000000ab";

fn counterparty(i: usize) -> String {
    format!("TMockCounterparty{i:016}")
}

/// Transfers of one hour: two deposits, one withdrawal, and one transfer
/// between unrelated addresses.
pub fn hour_transfers(start: DateTime<Utc>, hour: usize) -> Vec<WalletTransfer> {
    let inflow = 500.0 + (unit(30, hour).abs() * 250.0).round();
    let outflow = inflow - net_flow(hour);
    let first = (inflow * 0.6).round();
    let at = |minute: i64| start + Duration::hours(hour as i64) + Duration::minutes(minute);
    vec![
        WalletTransfer {
            ts: at(5),
            from: counterparty(hour),
            to: HOT_WALLET.to_string(),
            amount: first,
        },
        WalletTransfer {
            ts: at(21),
            from: counterparty(hour + 1),
            // exchanges report addresses in mixed case
            to: HOT_WALLET.to_ascii_uppercase(),
            amount: inflow - first,
        },
        WalletTransfer {
            ts: at(40),
            from: HOT_WALLET.to_string(),
            to: counterparty(hour + 2),
            amount: outflow,
        },
        WalletTransfer {
            ts: at(58),
            from: counterparty(hour + 3),
            to: counterparty(hour + 4),
            amount: 1_000.0,
        },
    ]
}
