//! Quality Reputation Engine
//!
//! Converts per-service quality outcomes and dispute verdicts into a
//! bounded reputation score, a discrete tier, and unlockable achievements
//! for marketplace providers.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │ ScoreFormula     │────►│ ReputationStore  │◄────│ DisputeVerdict  │
//! │ (weighted score) │     │ (per-key locks)  │     │ (flat penalty)  │
//! └──────────────────┘     └──────────────────┘     └─────────────────┘
//!                                   │
//!                    ┌──────────────┼──────────────┐
//!                    ▼              ▼              ▼
//!           ┌──────────────┐ ┌────────────┐ ┌──────────────┐
//!           │ TierClassifier│ │ Achievement│ │ Leaderboard  │
//!           │ (score→tier) │ │ Engine     │ │ / Summary    │
//!           └──────────────┘ └────────────┘ └──────────────┘
//! ```
//!
//! ## Score Model
//!
//! - Records start at 600 (BEGINNER) and stay within [0, 1000]
//! - Service completions recompute the five-factor weighted formula
//! - Disputes apply a flat penalty (-100 at fault, -20 cleared)
//! - Tier is always the classification of the current score
//! - Achievements unlock once and are never removed

mod achievements;
mod dispute;
mod record;
mod score;
mod store;
mod tier;

pub use achievements::{achievement_info, evaluate, Achievement, AchievementInfo};
pub use dispute::{DisputeOutcome, DisputeVerdict};
pub use record::{
    HistoryAction, HistoryEntry, ProviderStats, ReputationRecord, INITIAL_SCORE, MAX_SCORE,
};
pub use score::{compute_score, consistency_score};
pub use store::{
    EngineStats, LeaderboardRow, ProviderSummary, ReputationRepository, ReputationStore,
    ServiceOutcome, StoreSettings,
};
pub use tier::{tier_info, Tier, TierInfo};
