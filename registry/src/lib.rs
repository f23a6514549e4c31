//! Ticket registry operations for TicketChain.
//!
//! # Architecture
//!
//! [`TicketRegistry`] is the single entry point consumed by the HTTP route
//! layer: three state-changing operations (mint, transfer, burn) and two
//! read-only queries (balance, ownership), all executed through the
//! [`ChainClient`] backend selected at startup.
//!
//! Each state-changing operation:
//!
//! 1. folds the ticket identifier into its chain-safe token id,
//! 2. evaluates gas sponsorship for the call,
//! 3. submits the contract call and awaits the receipt,
//! 4. translates the receipt into a [`TransactionResult`].
//!
//! Operations are independent: there is no dedup, no ordering guarantee,
//! and concurrent calls for the same ticket can race freely. Chain errors
//! propagate un-retried, wrapped with the operation name; the HTTP layer
//! turns them into generic error responses.

use std::fmt;

use serde_json::json;
use thiserror::Error;

use tickr_chain::sponsor::Sponsorship;
use tickr_chain::{ChainClient, ChainError, ContractCall};
use tickr_config::{PaymasterSettings, Settings};
use tickr_types::{Address, TicketId, TransactionResult};

/// Registry operation names, used in logs and error prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Mint,
    Transfer,
    Burn,
    Balance,
}

impl Operation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Mint => "mint",
            Operation::Transfer => "transfer",
            Operation::Burn => "burn",
            Operation::Balance => "balance",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{operation} failed: {source}")]
    Chain {
        operation: Operation,
        #[source]
        source: ChainError,
    },
}

/// Ticket registry backed by the configured chain client.
#[derive(Debug, Clone)]
pub struct TicketRegistry {
    chain: ChainClient,
    paymaster: PaymasterSettings,
}

impl TicketRegistry {
    #[must_use]
    pub fn new(chain: ChainClient, paymaster: PaymasterSettings) -> Self {
        Self { chain, paymaster }
    }

    /// Build a registry from resolved settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            ChainClient::from_settings(&settings.chain),
            settings.paymaster.clone(),
        )
    }

    /// Mint `quantity` units of `ticket` to `to`.
    pub async fn mint(
        &self,
        to: &Address,
        ticket: &TicketId,
        quantity: u32,
    ) -> Result<TransactionResult, RegistryError> {
        let token = ticket.token_id();
        tracing::debug!(ticket = %ticket, token = token.value(), "resolved token id");
        let call = ContractCall::new(
            "mint",
            vec![json!(to.as_str()), json!(token.value()), json!(quantity)],
        );
        self.execute(Operation::Mint, call).await
    }

    /// Transfer `quantity` units of `ticket` from `from` to `to`.
    pub async fn transfer(
        &self,
        from: &Address,
        to: &Address,
        ticket: &TicketId,
        quantity: u32,
    ) -> Result<TransactionResult, RegistryError> {
        let token = ticket.token_id();
        tracing::debug!(ticket = %ticket, token = token.value(), "resolved token id");
        let call = ContractCall::new(
            "safeTransferFrom",
            vec![
                json!(from.as_str()),
                json!(to.as_str()),
                json!(token.value()),
                json!(quantity),
            ],
        );
        self.execute(Operation::Transfer, call).await
    }

    /// Burn `quantity` units of `ticket` held by `owner`.
    pub async fn burn(
        &self,
        owner: &Address,
        ticket: &TicketId,
        quantity: u32,
    ) -> Result<TransactionResult, RegistryError> {
        let token = ticket.token_id();
        tracing::debug!(ticket = %ticket, token = token.value(), "resolved token id");
        let call = ContractCall::new(
            "burn",
            vec![json!(owner.as_str()), json!(token.value()), json!(quantity)],
        );
        self.execute(Operation::Burn, call).await
    }

    /// Balance of `owner` for `ticket`. Zero whenever no contract is
    /// configured, regardless of input.
    pub async fn balance_of(
        &self,
        owner: &Address,
        ticket: &TicketId,
    ) -> Result<u64, RegistryError> {
        let token = ticket.token_id();
        let call = ContractCall::new(
            "balanceOf",
            vec![json!(owner.as_str()), json!(token.value())],
        );
        self.chain
            .query(call)
            .await
            .map_err(|source| RegistryError::Chain {
                operation: Operation::Balance,
                source,
            })
    }

    /// Whether `owner` holds at least one unit of `ticket`.
    pub async fn owns(&self, owner: &Address, ticket: &TicketId) -> Result<bool, RegistryError> {
        Ok(self.balance_of(owner, ticket).await? > 0)
    }

    async fn execute(
        &self,
        operation: Operation,
        call: ContractCall,
    ) -> Result<TransactionResult, RegistryError> {
        let sponsorship = Sponsorship::evaluate(&self.paymaster);
        let receipt = self
            .chain
            .submit(call)
            .await
            .map_err(|source| RegistryError::Chain { operation, source })?;
        tracing::info!(
            %operation,
            hash = %receipt.hash,
            success = receipt.status.succeeded(),
            "registry operation settled"
        );
        Ok(TransactionResult::from_receipt(&receipt)
            .with_sponsorship(sponsorship.sponsored(), sponsorship.gas_cost()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Operation, RegistryError, TicketRegistry};
    use tickr_chain::{ChainClient, ChainError};
    use tickr_config::Settings;
    use tickr_types::{Address, TicketId};

    fn simulated_registry() -> TicketRegistry {
        TicketRegistry::from_settings(&Settings::default())
    }

    fn addr(raw: &str) -> Address {
        Address::new(raw).unwrap()
    }

    #[tokio::test]
    async fn simulated_mint_succeeds_with_a_fabricated_hash() {
        let registry = simulated_registry();
        let result = registry
            .mint(&addr("0x1111111111111111111111111111111111111111"), &TicketId::new("1000"), 2)
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.tx_hash.as_str().starts_with("0x"));
        assert!(result.tx_hash.as_str().len() > 10);
    }

    #[tokio::test]
    async fn simulated_operations_report_sponsorship() {
        let registry = simulated_registry();
        let result = registry
            .transfer(
                &addr("0xseller"),
                &addr("0xbuyer"),
                &TicketId::new("event-2025-vip-standing"),
                1,
            )
            .await
            .unwrap();

        assert_eq!(result.gas_sponsored, Some(true));
        assert_eq!(result.gas_cost.as_deref(), Some("0"));
    }

    #[tokio::test]
    async fn simulated_queries_report_empty_state() {
        let registry = simulated_registry();
        let owner = addr("0xowner");
        let ticket = TicketId::new("1000");

        assert_eq!(registry.balance_of(&owner, &ticket).await.unwrap(), 0);
        assert!(!registry.owns(&owner, &ticket).await.unwrap());
    }

    #[tokio::test]
    async fn repeated_mints_are_independent() {
        let registry = simulated_registry();
        let to = addr("0xbuyer");
        let ticket = TicketId::new("1000");

        let first = registry.mint(&to, &ticket, 1).await.unwrap();
        let second = registry.mint(&to, &ticket, 1).await.unwrap();
        assert_ne!(first.tx_hash, second.tx_hash);
    }

    #[test]
    fn errors_carry_the_operation_prefix() {
        let error = RegistryError::Chain {
            operation: Operation::Mint,
            source: ChainError::Node {
                code: -32000,
                message: "insufficient funds".to_string(),
            },
        };
        assert_eq!(
            error.to_string(),
            "mint failed: chain node error -32000: insufficient funds"
        );
    }

    #[test]
    fn from_settings_defaults_to_simulation() {
        let registry = simulated_registry();
        assert!(matches!(registry.chain, ChainClient::Mock(_)));
    }
}
