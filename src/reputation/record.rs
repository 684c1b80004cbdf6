//! Per-Provider Reputation Records
//!
//! One record per marketplace provider, owned exclusively by the
//! ReputationStore. Score is bounded to [0, 1000] and the tier is always
//! the classification of the current score. Achievements and history are
//! append-only: an unlocked achievement is never removed and a history
//! entry is never mutated after insertion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reputation::achievements::Achievement;
use crate::reputation::tier::Tier;

/// Upper bound of the reputation score range.
pub const MAX_SCORE: u32 = 1000;

/// Score assigned to a provider before any service has been recorded.
pub const INITIAL_SCORE: u32 = 600;

/// Reputation state for a single provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationRecord {
    /// Opaque provider identity, used as the store key
    pub provider: String,

    /// Bounded reputation score, 0..=1000
    pub score: u32,

    /// Always `Tier::classify(score)` - never set independently
    pub tier: Tier,

    /// Service statistics feeding the score formula
    pub stats: ProviderStats,

    /// Unlocked achievements, in unlock order (append-only)
    pub achievements: Vec<Achievement>,

    /// Event log, newest last (append-only, windowed)
    pub history: Vec<HistoryEntry>,
}

impl ReputationRecord {
    pub fn new(provider: String, initial_score: u32) -> Self {
        Self {
            provider,
            score: initial_score,
            tier: Tier::classify(initial_score),
            stats: ProviderStats::default(),
            achievements: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Append a history entry, aging out the oldest once the window is full
    pub fn push_history(&mut self, entry: HistoryEntry, window: usize) {
        self.history.push(entry);
        if self.history.len() > window {
            let excess = self.history.len() - window;
            self.history.drain(..excess);
        }
    }

    /// The most recent `limit` history entries, newest first
    pub fn recent_history(&self, limit: usize) -> Vec<HistoryEntry> {
        self.history.iter().rev().take(limit).cloned().collect()
    }
}

/// Per-provider service statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderStats {
    /// Total services recorded (monotonically non-decreasing)
    pub total_services: u64,

    /// Completed services, incremented in lockstep with `total_services`
    pub completed_services: u64,

    /// Services that went to dispute
    pub disputed_services: u64,

    /// Mean quality over ALL services, maintained incrementally so the
    /// quality window below never skews it
    pub avg_quality: f64,

    /// Collateral returned across all services
    pub total_collateral_earned: f64,

    /// Penalties applied across all services
    pub total_penalties: f64,

    /// Most recent per-service quality values (0-100), oldest first.
    /// Windowed: consistency and achievement checks only need the tail.
    pub quality_history: Vec<u8>,

    /// Set once on the first recorded service, never cleared
    pub first_service_date: Option<DateTime<Utc>>,

    /// Updated on every recorded service
    pub last_service_date: Option<DateTime<Utc>>,
}

impl ProviderStats {
    /// Append a quality value, aging out the oldest once the window is full
    pub fn push_quality(&mut self, quality: u8, window: usize) {
        self.quality_history.push(quality);
        if self.quality_history.len() > window {
            let excess = self.quality_history.len() - window;
            self.quality_history.drain(..excess);
        }
    }
}

/// What a history entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    ServiceCompleted,
    DisputeLost,
    DisputeWon,
}

/// An immutable entry in a provider's event log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub service_id: String,
    pub action: HistoryAction,
    pub old_score: u32,
    pub new_score: u32,
    pub score_delta: i32,

    /// Final quality, present on `service_completed` entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,

    /// Collateral returned, present on `service_completed` entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collateral_returned: Option<f64>,

    /// Penalty applied, present on `service_completed` entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty_applied: Option<f64>,

    /// Refund amount, present on dispute entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = ReputationRecord::new("provider_1".to_string(), INITIAL_SCORE);
        assert_eq!(record.score, 600);
        assert_eq!(record.tier, Tier::Beginner);
        assert_eq!(record.stats.total_services, 0);
        assert!(record.achievements.is_empty());
        assert!(record.history.is_empty());
    }

    #[test]
    fn test_quality_window_ages_out_oldest() {
        let mut stats = ProviderStats::default();
        for q in 0..10u8 {
            stats.push_quality(q, 5);
        }
        assert_eq!(stats.quality_history, vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_recent_history_newest_first() {
        let mut record = ReputationRecord::new("provider_1".to_string(), INITIAL_SCORE);
        for i in 0..8 {
            record.push_history(
                HistoryEntry {
                    timestamp: Utc::now(),
                    service_id: format!("svc_{}", i),
                    action: HistoryAction::ServiceCompleted,
                    old_score: 600,
                    new_score: 600,
                    score_delta: 0,
                    quality: None,
                    collateral_returned: None,
                    penalty_applied: None,
                    refund_amount: None,
                },
                100,
            );
        }

        let recent = record.recent_history(5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].service_id, "svc_7");
        assert_eq!(recent[4].service_id, "svc_3");
    }
}
