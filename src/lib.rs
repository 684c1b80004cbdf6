//! Quality Reputation Engine
//!
//! Converts per-service quality outcomes and dispute verdicts for
//! marketplace providers into a bounded reputation score, a discrete tier,
//! and unlockable achievements, and exposes that state for profile
//! summaries and leaderboards.
//!
//! ## Module Structure
//!
//! ```text
//! src/
//! ├── lib.rs         - Crate root with re-exports
//! ├── main.rs        - Server entrypoint
//! ├── config.rs      - Configuration management
//! ├── reputation/    - Core engine
//! │   ├── record.rs       - Per-provider records, stats, history log
//! │   ├── score.rs        - Weighted score formula + consistency estimator
//! │   ├── tier.rs         - Score→tier classification + metadata
//! │   ├── achievements.rs - One-way achievement unlocking + metadata
//! │   ├── dispute.rs      - Dispute verdicts and flat penalties
//! │   └── store.rs        - Keyed store with per-provider locks, views
//! └── api/           - HTTP API endpoints
//!     └── reputation.rs - Settlement ingest + read projections
//! ```

pub mod api;
pub mod config;
pub mod reputation;

// Re-export main types for convenience
pub use config::EngineConfig;
pub use reputation::{
    achievement_info, tier_info, Achievement, AchievementInfo, DisputeOutcome, DisputeVerdict,
    EngineStats, HistoryAction, HistoryEntry, LeaderboardRow, ProviderStats, ProviderSummary,
    ReputationRecord, ReputationRepository, ReputationStore, ServiceOutcome, StoreSettings, Tier,
    TierInfo,
};
