use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest identifier submitted to the chain verbatim.
const MAX_VERBATIM_LEN: usize = 10;

/// Folded identifiers are reduced into `0..FOLD_MODULUS`.
const FOLD_MODULUS: u64 = 1_000_000_000;

/// Opaque ticket identifier as issued by the marketplace.
///
/// Identifiers are arbitrary strings (database ids, slugs, plain numbers).
/// [`TicketId::token_id`] derives the numeric form the chain accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Chain-safe numeric id for this identifier.
    ///
    /// Identifiers of at most 10 characters that parse as decimal integers
    /// pass through verbatim. Anything longer (or non-numeric) is folded
    /// with a signed 32-bit multiply-by-31 rolling hash over the UTF-8
    /// bytes, reduced modulo 10^9. The fold is deterministic but lossy:
    /// distinct identifiers can land on the same token id.
    #[must_use]
    pub fn token_id(&self) -> TokenId {
        if self.0.len() <= MAX_VERBATIM_LEN
            && let Ok(numeric) = self.0.parse::<u64>()
        {
            return TokenId(numeric);
        }
        TokenId(fold(&self.0))
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn fold(value: &str) -> u64 {
    let mut hash: i32 = 0;
    for byte in value.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(byte));
    }
    u64::from(hash.unsigned_abs()) % FOLD_MODULUS
}

/// Numeric id submitted to the chain for a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(u64);

impl TokenId {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
