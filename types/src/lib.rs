//! Core domain types for TicketChain.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the platform:
//! wallet addresses, ticket identifiers and their chain-safe numeric form,
//! and the receipt/result records produced by registry operations.

mod address;
mod result;
mod ticket;

pub use address::{Address, AddressError};
pub use result::{
    ReceiptStatus, ReceiptStatusError, TransactionReceipt, TransactionResult, TxHash, TxHashError,
};
pub use ticket::{TicketId, TokenId};
