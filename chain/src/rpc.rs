//! JSON-RPC 2.0 client for a TicketChain node.
//!
//! Three node methods back the registry:
//!
//! | Method | Purpose |
//! |--------|---------|
//! | `tikr_sendTransaction` | Submit a contract call; returns the pending tx hash |
//! | `tikr_getTransactionReceipt` | Receipt for a hash; `null` while pending |
//! | `tikr_call` | Read-only contract call; returns a numeric value |
//!
//! [`RpcChain::submit`] sends the transaction and then polls for the receipt
//! at the configured interval up to the configured attempt cap; exhaustion
//! surfaces as [`ChainError::ReceiptTimeout`]. Nothing is retried.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use tickr_config::ChainSettings;
use tickr_types::{Address, TransactionReceipt, TxHash};

use crate::{ChainError, ContractCall};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct RpcChain {
    http: reqwest::Client,
    endpoint: Url,
    contract: Address,
    receipt_poll_interval: Duration,
    receipt_poll_attempts: u32,
    next_id: Arc<AtomicU64>,
}

impl RpcChain {
    #[must_use]
    pub fn new(endpoint: Url, contract: Address, settings: &ChainSettings) -> Self {
        // Plain HTTP is allowed: development nodes commonly listen on
        // localhost without TLS.
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
            .timeout(settings.request_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("failed to build tuned HTTP client: {e}; using defaults");
                reqwest::Client::new()
            });

        Self {
            http,
            endpoint,
            contract,
            receipt_poll_interval: settings.receipt_poll_interval,
            receipt_poll_attempts: settings.receipt_poll_attempts,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Submit a state-changing contract call and await its receipt.
    pub async fn submit(&self, call: &ContractCall) -> Result<TransactionReceipt, ChainError> {
        let hash: TxHash = self
            .request("tikr_sendTransaction", self.call_params(call))
            .await?;
        tracing::debug!(method = call.method, hash = %hash, "transaction submitted");
        self.await_receipt(hash).await
    }

    /// Execute a read-only contract call.
    pub async fn query(&self, call: &ContractCall) -> Result<u64, ChainError> {
        self.request("tikr_call", self.call_params(call)).await
    }

    fn call_params(&self, call: &ContractCall) -> serde_json::Value {
        serde_json::json!([{
            "to": self.contract.as_str(),
            "method": call.method,
            "params": call.params,
        }])
    }

    async fn await_receipt(&self, hash: TxHash) -> Result<TransactionReceipt, ChainError> {
        for attempt in 1..=self.receipt_poll_attempts {
            let receipt: Option<TransactionReceipt> = self
                .request(
                    "tikr_getTransactionReceipt",
                    serde_json::json!([hash.as_str()]),
                )
                .await?;
            if let Some(receipt) = receipt {
                tracing::debug!(hash = %receipt.hash, attempt, "receipt confirmed");
                return Ok(receipt);
            }
            tokio::time::sleep(self.receipt_poll_interval).await;
        }
        Err(ChainError::ReceiptTimeout {
            hash,
            attempts: self.receipt_poll_attempts,
        })
    }

    async fn request<T>(
        &self,
        method: &'static str,
        params: serde_json::Value,
    ) -> Result<T, ChainError>
    where
        T: serde::de::DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let envelope: RpcResponse = response.json().await?;

        if let Some(error) = envelope.error {
            return Err(ChainError::Node {
                code: error.code,
                message: error.message,
            });
        }

        let result = envelope.result.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(result).map_err(|e| ChainError::MalformedResponse(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}
