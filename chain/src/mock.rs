//! Simulated chain backend.
//!
//! Used whenever no contract is configured. State-changing calls fabricate
//! successful receipts with random hashes; nothing is persisted anywhere,
//! and repeated calls for the same ticket produce independent receipts.
//! Read-only calls report empty state.

use std::fmt::Write as _;

use rand::RngExt as _;

use tickr_types::{ReceiptStatus, TransactionReceipt, TxHash};

use crate::ContractCall;

const HASH_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, Default)]
pub struct MockChain;

impl MockChain {
    /// Fabricate a successful receipt for `call`. No state changes anywhere.
    #[must_use]
    pub fn submit(&self, call: &ContractCall) -> TransactionReceipt {
        let hash = random_tx_hash();
        tracing::debug!(method = call.method, hash = %hash, "simulated contract call");
        TransactionReceipt {
            hash,
            status: ReceiptStatus::Succeeded,
        }
    }

    #[must_use]
    pub fn query(&self, call: &ContractCall) -> u64 {
        tracing::debug!(method = call.method, "simulated contract query");
        0
    }
}

fn random_tx_hash() -> TxHash {
    let mut rng = rand::rng();
    let mut raw = String::with_capacity(2 + HASH_BYTES * 2);
    raw.push_str("0x");
    for _ in 0..HASH_BYTES {
        let byte: u8 = rng.random();
        let _ = write!(raw, "{byte:02x}");
    }
    TxHash::parse(raw).expect("fabricated hashes are lowercase hex")
}
