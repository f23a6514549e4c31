use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `0x`-prefixed lowercase-hex transaction hash.
///
/// Parsing validates the shape and normalizes the digits to lowercase;
/// whether the hash is bound to any real transaction is the chain node's
/// business, not ours.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxHashError {
    #[error("transaction hash must start with 0x")]
    MissingPrefix,
    #[error("transaction hash has no hex digits")]
    Empty,
    #[error("transaction hash contains non-hex character '{0}'")]
    InvalidChar(char),
}

impl TxHash {
    pub fn parse(value: impl Into<String>) -> Result<Self, TxHashError> {
        let value = value.into();
        let Some(digits) = value.strip_prefix("0x") else {
            return Err(TxHashError::MissingPrefix);
        };
        if digits.is_empty() {
            return Err(TxHashError::Empty);
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(TxHashError::InvalidChar(bad));
        }
        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TxHash {
    type Error = TxHashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TxHash> for String {
    fn from(hash: TxHash) -> Self {
        hash.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Execution status reported by a transaction receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ReceiptStatus {
    Failed,
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid receipt status {0}; expected 0 or 1")]
pub struct ReceiptStatusError(u8);

impl ReceiptStatus {
    #[must_use]
    pub const fn succeeded(self) -> bool {
        matches!(self, ReceiptStatus::Succeeded)
    }
}

impl TryFrom<u8> for ReceiptStatus {
    type Error = ReceiptStatusError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ReceiptStatus::Failed),
            1 => Ok(ReceiptStatus::Succeeded),
            other => Err(ReceiptStatusError(other)),
        }
    }
}

impl From<ReceiptStatus> for u8 {
    fn from(status: ReceiptStatus) -> Self {
        match status {
            ReceiptStatus::Failed => 0,
            ReceiptStatus::Succeeded => 1,
        }
    }
}

/// Transaction receipt as reported by the chain node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub hash: TxHash,
    pub status: ReceiptStatus,
}

/// Marketplace-facing record of a registry operation.
///
/// Serialized with the camelCase field names the REST layer exposes
/// (`txHash`, `gasSponsored`, `gasCost`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    pub tx_hash: TxHash,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_sponsored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_cost: Option<String>,
}

impl TransactionResult {
    #[must_use]
    pub fn from_receipt(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.hash.clone(),
            success: receipt.status.succeeded(),
            gas_sponsored: None,
            gas_cost: None,
        }
    }

    #[must_use]
    pub fn with_sponsorship(mut self, sponsored: bool, gas_cost: impl Into<String>) -> Self {
        self.gas_sponsored = Some(sponsored);
        self.gas_cost = Some(gas_cost.into());
        self
    }
}
