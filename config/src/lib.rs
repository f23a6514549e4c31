//! Configuration loading and resolution for TicketChain.
//!
//! Raw TOML deserialization structs (with `Option` fields) stay private in
//! this crate. [`Settings::load`] resolves file values and environment
//! overrides into validated settings at the parse boundary; downstream
//! crates only ever see the resolved types.
//!
//! A missing config file is not an error: the empty snapshot selects the
//! simulated chain backend and leaves gas sponsorship unconfigured.
//!
//! Environment access is injected as a lookup function so resolution is
//! testable without mutating process state.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use tickr_types::{Address, AddressError};

pub const RPC_URL_VAR: &str = "TICKR_RPC_URL";
pub const CONTRACT_ADDRESS_VAR: &str = "TICKR_CONTRACT_ADDRESS";
pub const PAYMASTER_API_KEY_VAR: &str = "TICKR_PAYMASTER_API_KEY";
pub const PAYMASTER_URL_VAR: &str = "TICKR_PAYMASTER_URL";
pub const RECEIPT_POLL_MS_VAR: &str = "TICKR_RECEIPT_POLL_MS";
pub const RECEIPT_POLL_ATTEMPTS_VAR: &str = "TICKR_RECEIPT_POLL_ATTEMPTS";
pub const REQUEST_TIMEOUT_SECS_VAR: &str = "TICKR_REQUEST_TIMEOUT_SECS";

const CONFIG_FILE_NAME: &str = "tickr.toml";

const DEFAULT_RECEIPT_POLL_MS: u64 = 500;
const DEFAULT_RECEIPT_POLL_ATTEMPTS: u32 = 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid {field}: {source}")]
    InvalidUrl {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid {field}: {source}")]
    InvalidAddress {
        field: &'static str,
        #[source]
        source: AddressError,
    },
    #[error("invalid {field} '{raw}': expected a positive integer")]
    InvalidNumber { field: &'static str, raw: String },
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default)]
    chain: RawChainSettings,
    #[serde(default)]
    paymaster: RawPaymasterSettings,
}

#[derive(Debug, Default, Deserialize)]
struct RawChainSettings {
    rpc_url: Option<String>,
    contract_address: Option<String>,
    receipt_poll_ms: Option<u64>,
    receipt_poll_attempts: Option<u32>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPaymasterSettings {
    api_key: Option<String>,
    url: Option<String>,
}

/// Resolved chain connection settings.
///
/// Both `rpc_url` and `contract_address` must be present for the RPC
/// backend; anything less selects simulation.
#[derive(Debug, Clone)]
pub struct ChainSettings {
    pub rpc_url: Option<Url>,
    pub contract_address: Option<Address>,
    pub receipt_poll_interval: Duration,
    pub receipt_poll_attempts: u32,
    pub request_timeout: Duration,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            rpc_url: None,
            contract_address: None,
            receipt_poll_interval: Duration::from_millis(DEFAULT_RECEIPT_POLL_MS),
            receipt_poll_attempts: DEFAULT_RECEIPT_POLL_ATTEMPTS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Paymaster API key.
///
/// `Debug` is manually implemented to redact the value, preventing
/// accidental credential disclosure in logs or error messages.
#[derive(Clone, PartialEq, Eq)]
pub struct PaymasterKey(String);

impl fmt::Debug for PaymasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PaymasterKey(<redacted>)")
    }
}

impl PaymasterKey {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

/// Paymaster configuration snapshot: two opaque values.
///
/// No relay protocol is ever spoken from this crate; the snapshot only
/// feeds the sponsorship predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymasterSettings {
    api_key: Option<PaymasterKey>,
    url: Option<String>,
}

impl PaymasterSettings {
    /// Build a snapshot, treating empty or all-whitespace values as absent.
    #[must_use]
    pub fn new(api_key: Option<PaymasterKey>, url: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.expose_secret().trim().is_empty()),
            url: url.filter(|url| !url.trim().is_empty()),
        }
    }

    /// Sponsorship predicate: true iff both the API key and the paymaster
    /// URL are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.url.is_some()
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&PaymasterKey> {
        self.api_key.as_ref()
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// Fully resolved settings snapshot, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub chain: ChainSettings,
    pub paymaster: PaymasterSettings,
}

impl Settings {
    /// Load settings from the first config file found (`tickr.toml` in the
    /// working directory, then `~/.tickr/config.toml`), applying
    /// environment overrides. No file at all resolves to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        for candidate in config_file_candidates() {
            if candidate.exists() {
                return Self::load_from(&candidate);
            }
        }
        tracing::debug!("no config file found; using defaults");
        Self::resolve(RawSettings::default(), &process_env)
    }

    /// Load settings from an explicit config file path, applying
    /// environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawSettings = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::resolve(raw, &process_env)
    }

    fn resolve(
        raw: RawSettings,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let rpc_url = match pick(env(RPC_URL_VAR), raw.chain.rpc_url) {
            Some(value) => Some(Url::parse(&value).map_err(|source| ConfigError::InvalidUrl {
                field: "rpc_url",
                source,
            })?),
            None => None,
        };

        let contract_address = match pick(env(CONTRACT_ADDRESS_VAR), raw.chain.contract_address) {
            Some(value) => {
                Some(
                    Address::new(value).map_err(|source| ConfigError::InvalidAddress {
                        field: "contract_address",
                        source,
                    })?,
                )
            }
            None => None,
        };

        let poll_ms = resolve_number(
            env(RECEIPT_POLL_MS_VAR),
            raw.chain.receipt_poll_ms,
            "receipt_poll_ms",
        )?
        .unwrap_or(DEFAULT_RECEIPT_POLL_MS);

        let poll_attempts = resolve_number(
            env(RECEIPT_POLL_ATTEMPTS_VAR),
            raw.chain.receipt_poll_attempts,
            "receipt_poll_attempts",
        )?
        .unwrap_or(DEFAULT_RECEIPT_POLL_ATTEMPTS);
        if poll_attempts == 0 {
            return Err(ConfigError::InvalidNumber {
                field: "receipt_poll_attempts",
                raw: "0".to_string(),
            });
        }

        let timeout_secs = resolve_number(
            env(REQUEST_TIMEOUT_SECS_VAR),
            raw.chain.request_timeout_secs,
            "request_timeout_secs",
        )?
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let paymaster = PaymasterSettings::new(
            pick(env(PAYMASTER_API_KEY_VAR), raw.paymaster.api_key).map(PaymasterKey::new),
            pick(env(PAYMASTER_URL_VAR), raw.paymaster.url),
        );

        Ok(Self {
            chain: ChainSettings {
                rpc_url,
                contract_address,
                receipt_poll_interval: Duration::from_millis(poll_ms),
                receipt_poll_attempts: poll_attempts,
                request_timeout: Duration::from_secs(timeout_secs),
            },
            paymaster,
        })
    }
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".tickr").join("config.toml"));
    }
    candidates
}

/// Environment value wins over the file value; empty strings count as absent.
fn pick(env_value: Option<String>, file_value: Option<String>) -> Option<String> {
    env_value
        .filter(|value| !value.trim().is_empty())
        .or_else(|| file_value.filter(|value| !value.trim().is_empty()))
}

fn resolve_number<T: FromStr>(
    env_value: Option<String>,
    file_value: Option<T>,
    field: &'static str,
) -> Result<Option<T>, ConfigError> {
    match env_value.filter(|value| !value.trim().is_empty()) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(ConfigError::InvalidNumber { field, raw }),
        },
        None => Ok(file_value),
    }
}
