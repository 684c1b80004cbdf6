//! Dispute Adjudication
//!
//! Disputes arrive already adjudicated by the settlement layer; this
//! module only maps the verdict onto a flat score penalty. The weighted
//! formula is deliberately NOT re-run on the dispute path even though
//! `disputed_services` feeds its dispute sub-score - the flat delta is the
//! observed product behavior and changing it requires product sign-off.

use serde::{Deserialize, Serialize};

use crate::reputation::record::HistoryAction;

/// Resolved dispute outcome delivered by the settlement layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisputeOutcome {
    pub service_id: String,

    /// Whether the adjudication found the provider at fault
    pub was_provider_fault: bool,

    /// Amount refunded to the client (informational only)
    pub refund_amount: f64,
}

impl DisputeOutcome {
    pub fn verdict(&self) -> DisputeVerdict {
        if self.was_provider_fault {
            DisputeVerdict::ProviderFault
        } else {
            DisputeVerdict::ProviderCleared
        }
    }
}

/// Adjudicated dispute verdict and its score consequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisputeVerdict {
    /// Provider found at fault
    ProviderFault,
    /// Provider cleared; a small penalty still applies for the dispute itself
    ProviderCleared,
}

impl DisputeVerdict {
    /// Flat score deduction for this verdict
    pub fn point_deduction(&self) -> u32 {
        match self {
            DisputeVerdict::ProviderFault => 100,
            DisputeVerdict::ProviderCleared => 20,
        }
    }

    /// History action recorded for this verdict
    pub fn action(&self) -> HistoryAction {
        match self {
            DisputeVerdict::ProviderFault => HistoryAction::DisputeLost,
            DisputeVerdict::ProviderCleared => HistoryAction::DisputeWon,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DisputeVerdict::ProviderFault => "Dispute resolved against the provider",
            DisputeVerdict::ProviderCleared => "Dispute resolved in the provider's favor",
        }
    }
}
