//! Per-operation gas sponsorship decisions.
//!
//! The platform covers gas on every registry operation. With a configured
//! paymaster the cost is assumed to land there; without one the sponsorship
//! is simulated outright. Either way no relay protocol runs here: the
//! decision is a pure function of the configuration snapshot
//! ([`PaymasterSettings::is_configured`]), with a diagnostic log line as
//! the only side effect.

use tickr_config::PaymasterSettings;

/// Sponsorship record attached to each state-changing result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sponsorship {
    sponsored: bool,
    gas_cost: String,
}

impl Sponsorship {
    /// Evaluate sponsorship for one operation.
    #[must_use]
    pub fn evaluate(paymaster: &PaymasterSettings) -> Self {
        if !paymaster.is_configured() {
            tracing::debug!("paymaster not configured; simulating sponsored transaction");
        }
        Self {
            sponsored: true,
            gas_cost: "0".to_string(),
        }
    }

    #[must_use]
    pub fn sponsored(&self) -> bool {
        self.sponsored
    }

    #[must_use]
    pub fn gas_cost(&self) -> &str {
        &self.gas_cost
    }
}
