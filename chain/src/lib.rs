//! Chain client backends for the TicketChain registry.
//!
//! # Architecture
//!
//! The crate is organized around a backend dispatch pattern:
//!
//! - [`ChainClient`] - Unified entry point that dispatches to backend-specific implementations
//! - [`mock`] - Simulated backend used when no contract is configured
//! - [`rpc`] - JSON-RPC 2.0 client for a TicketChain node
//! - [`sponsor`] - Per-operation gas sponsorship decisions
//!
//! Backend selection happens once, in [`ChainClient::from_settings`]: a
//! configured contract address plus RPC endpoint selects the RPC backend,
//! anything less falls back to simulation.
//!
//! # Error Handling
//!
//! Backend failures surface as [`ChainError`] and propagate un-retried;
//! there is no retry policy, partial-failure handling, or circuit breaking
//! at this layer. The simulated backend never fails.

pub mod mock;
pub mod rpc;
pub mod sponsor;

use serde::Serialize;
use thiserror::Error;

use tickr_config::ChainSettings;
use tickr_types::{TransactionReceipt, TxHash};

/// Contract call descriptor: method name plus JSON-encoded arguments.
///
/// The node resolves the method against the registry contract; this crate
/// never sees an ABI.
#[derive(Debug, Clone, Serialize)]
pub struct ContractCall {
    pub method: &'static str,
    pub params: Vec<serde_json::Value>,
}

impl ContractCall {
    #[must_use]
    pub fn new(method: &'static str, params: Vec<serde_json::Value>) -> Self {
        Self { method, params }
    }
}

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("chain node error {code}: {message}")]
    Node { code: i64, message: String },
    #[error("malformed chain response: {0}")]
    MalformedResponse(String),
    #[error("no receipt for {hash} after {attempts} attempts")]
    ReceiptTimeout { hash: TxHash, attempts: u32 },
}

/// Chain backend selected from settings at startup.
#[derive(Debug, Clone)]
pub enum ChainClient {
    /// Simulated chain: fabricates receipts, reports empty balances.
    Mock(mock::MockChain),
    /// JSON-RPC client for a TicketChain node.
    Rpc(rpc::RpcChain),
}

impl ChainClient {
    /// Select a backend from the resolved settings.
    #[must_use]
    pub fn from_settings(settings: &ChainSettings) -> Self {
        match (&settings.contract_address, &settings.rpc_url) {
            (Some(contract), Some(rpc_url)) => {
                tracing::info!(
                    contract = %contract,
                    endpoint = %rpc_url,
                    "using RPC chain backend"
                );
                ChainClient::Rpc(rpc::RpcChain::new(
                    rpc_url.clone(),
                    contract.clone(),
                    settings,
                ))
            }
            _ => {
                tracing::info!("no contract configured; chain operations will be simulated");
                ChainClient::Mock(mock::MockChain)
            }
        }
    }

    #[must_use]
    pub fn is_simulated(&self) -> bool {
        matches!(self, ChainClient::Mock(_))
    }

    /// Execute a state-changing contract call and await its receipt.
    pub async fn submit(&self, call: ContractCall) -> Result<TransactionReceipt, ChainError> {
        match self {
            ChainClient::Mock(chain) => Ok(chain.submit(&call)),
            ChainClient::Rpc(chain) => chain.submit(&call).await,
        }
    }

    /// Execute a read-only contract call returning a numeric value.
    pub async fn query(&self, call: ContractCall) -> Result<u64, ChainError> {
        match self {
            ChainClient::Mock(chain) => Ok(chain.query(&call)),
            ChainClient::Rpc(chain) => chain.query(&call).await,
        }
    }
}
