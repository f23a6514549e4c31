use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque wallet address.
///
/// Addresses pass through this subsystem verbatim: the chain node is the
/// authority on their format, so construction only rejects empty input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("address must not be empty")]
pub struct AddressError;

impl Address {
    pub fn new(value: impl Into<String>) -> Result<Self, AddressError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(AddressError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
