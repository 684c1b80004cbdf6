//! Reputation Store - Keyed Record Collection
//!
//! Owns every provider record and serializes mutation per key: each record
//! lives in its own `Arc<RwLock<..>>` cell inside a `DashMap`, so two
//! writers to the same provider queue on the record lock while writers to
//! different providers never contend. Reads clone a snapshot under the
//! read half of the lock, so a record is never observed mid-update.
//!
//! Persistence is an injected `ReputationRepository`; the in-memory map
//! stays the source of truth and saves are best-effort.

use anyhow::Result;
use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::reputation::achievements::{self, AchievementInfo};
use crate::reputation::dispute::DisputeOutcome;
use crate::reputation::record::{
    HistoryAction, HistoryEntry, ProviderStats, ReputationRecord, INITIAL_SCORE,
};
use crate::reputation::score::compute_score;
use crate::reputation::tier::{Tier, TierInfo};

/// Injected persistence contract. Implementations are keyed by provider;
/// the store calls `load` on a cache miss and `save` after every mutation.
pub trait ReputationRepository: Send + Sync {
    fn load(&self, provider: &str) -> Result<Option<ReputationRecord>>;
    fn save(&self, record: &ReputationRecord) -> Result<()>;
}

/// Tuning knobs for the store
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Score given to a provider before any service is recorded
    pub initial_score: u32,

    /// Retained quality values per provider (consistency + achievement
    /// checks only need the tail)
    pub quality_window: usize,

    /// Retained history entries per provider
    pub history_window: usize,

    /// Leaderboard size when the caller does not pass a limit
    pub default_leaderboard_limit: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            initial_score: INITIAL_SCORE,
            quality_window: 50,
            history_window: 100,
            default_leaderboard_limit: 100,
        }
    }
}

/// Finalized service outcome delivered by the settlement layer.
///
/// `final_quality` must be within 0..=100; the core does not validate this,
/// callers guarantee the contract (the HTTP boundary clamps defensively).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOutcome {
    pub service_id: String,
    pub final_quality: u8,
    pub collateral_returned: f64,
    pub penalty_applied: f64,
    /// Informational only on this path; dispute penalties arrive separately
    pub is_disputed: bool,
}

type RecordCell = Arc<RwLock<ReputationRecord>>;

/// Keyed collection of reputation records with per-provider mutation locks
pub struct ReputationStore {
    records: DashMap<String, RecordCell>,
    repository: Option<Arc<dyn ReputationRepository>>,
    settings: StoreSettings,
}

impl ReputationStore {
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            records: DashMap::new(),
            repository: None,
            settings,
        }
    }

    pub fn with_repository(mut self, repository: Arc<dyn ReputationRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Get or lazily create the lock cell for a provider. The dashmap shard
    /// guard is dropped before any await, so shards are never held across
    /// suspension points.
    fn cell(&self, provider: &str) -> RecordCell {
        if let Some(cell) = self.records.get(provider) {
            return cell.clone();
        }

        let record = self
            .load_from_repository(provider)
            .unwrap_or_else(|| ReputationRecord::new(provider.to_string(), self.settings.initial_score));

        self.records
            .entry(provider.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(record)))
            .clone()
    }

    fn load_from_repository(&self, provider: &str) -> Option<ReputationRecord> {
        let repository = self.repository.as_ref()?;
        match repository.load(provider) {
            Ok(record) => record,
            Err(e) => {
                warn!(provider = %provider, error = %e, "failed to load reputation record");
                None
            }
        }
    }

    fn persist(&self, record: &ReputationRecord) {
        if let Some(ref repository) = self.repository {
            if let Err(e) = repository.save(record) {
                warn!(
                    provider = %record.provider,
                    error = %e,
                    "failed to persist reputation record"
                );
            }
        }
    }

    /// Incorporate a finalized service: update stats, recompute the score
    /// through the weighted formula, reclassify the tier, run achievement
    /// checks, and append a `service_completed` history entry - all under
    /// the provider's write lock.
    pub async fn update_after_service(
        &self,
        provider: &str,
        outcome: ServiceOutcome,
    ) -> ReputationRecord {
        let cell = self.cell(provider);
        let mut record = cell.write().await;

        let now = Utc::now();
        let old_score = record.score;
        let quality_window = self.settings.quality_window;

        let stats = &mut record.stats;
        stats.total_services += 1;
        stats.completed_services += 1;
        stats.total_collateral_earned += outcome.collateral_returned;
        stats.total_penalties += outcome.penalty_applied;
        stats.push_quality(outcome.final_quality, quality_window);

        let n = stats.total_services as f64;
        stats.avg_quality = (stats.avg_quality * (n - 1.0) + outcome.final_quality as f64) / n;

        if stats.first_service_date.is_none() {
            stats.first_service_date = Some(now);
        }
        stats.last_service_date = Some(now);

        record.score = compute_score(&record.stats, now);
        record.tier = Tier::classify(record.score);

        for unlocked in achievements::evaluate(&record) {
            info!(
                provider = %provider,
                achievement = unlocked.id(),
                "achievement unlocked"
            );
            record.achievements.push(unlocked);
        }

        let new_score = record.score;
        record.push_history(
            HistoryEntry {
                timestamp: now,
                service_id: outcome.service_id.clone(),
                action: HistoryAction::ServiceCompleted,
                old_score,
                new_score,
                score_delta: new_score as i32 - old_score as i32,
                quality: Some(outcome.final_quality),
                collateral_returned: Some(outcome.collateral_returned),
                penalty_applied: Some(outcome.penalty_applied),
                refund_amount: None,
            },
            self.settings.history_window,
        );

        debug!(
            provider = %provider,
            service_id = %outcome.service_id,
            quality = outcome.final_quality,
            old_score,
            new_score,
            "recorded completed service"
        );

        self.persist(&record);
        record.clone()
    }

    /// Apply a resolved dispute: a flat penalty from the verdict, floored
    /// at zero, with the tier reclassified from the new score. The weighted
    /// formula is not re-run on this path (see `dispute` module docs).
    pub async fn update_after_dispute(
        &self,
        provider: &str,
        outcome: DisputeOutcome,
    ) -> ReputationRecord {
        let cell = self.cell(provider);
        let mut record = cell.write().await;

        let now = Utc::now();
        let old_score = record.score;
        let verdict = outcome.verdict();

        record.stats.disputed_services += 1;
        record.score = record.score.saturating_sub(verdict.point_deduction());
        record.tier = Tier::classify(record.score);

        for unlocked in achievements::evaluate(&record) {
            info!(
                provider = %provider,
                achievement = unlocked.id(),
                "achievement unlocked"
            );
            record.achievements.push(unlocked);
        }

        let new_score = record.score;
        record.push_history(
            HistoryEntry {
                timestamp: now,
                service_id: outcome.service_id.clone(),
                action: verdict.action(),
                old_score,
                new_score,
                score_delta: new_score as i32 - old_score as i32,
                quality: None,
                collateral_returned: None,
                penalty_applied: None,
                refund_amount: Some(outcome.refund_amount),
            },
            self.settings.history_window,
        );

        info!(
            provider = %provider,
            service_id = %outcome.service_id,
            verdict = verdict.description(),
            old_score,
            new_score,
            "dispute adjudicated"
        );

        self.persist(&record);
        record.clone()
    }

    /// Snapshot of a provider's record, lazily creating it on first
    /// reference
    pub async fn get_record(&self, provider: &str) -> ReputationRecord {
        let cell = self.cell(provider);
        let record = cell.read().await;
        record.clone()
    }

    /// Profile summary: score, tier metadata, stats, resolved achievement
    /// metadata, and the 5 most recent history entries (newest first)
    pub async fn get_summary(&self, provider: &str) -> ProviderSummary {
        let record = self.get_record(provider).await;

        ProviderSummary {
            provider: record.provider.clone(),
            score: record.score,
            tier: record.tier.into(),
            achievements: record
                .achievements
                .iter()
                .map(|&a| AchievementInfo::from(a))
                .collect(),
            recent_history: record.recent_history(5),
            stats: record.stats,
        }
    }

    /// Ranked projection over all records: score descending, ties broken by
    /// provider key ascending, truncated to `limit` (store default when
    /// `None`), 1-based rank.
    pub async fn get_leaderboard(&self, limit: Option<usize>) -> Vec<LeaderboardRow> {
        let limit = limit.unwrap_or(self.settings.default_leaderboard_limit);

        // Collect the cells first so no dashmap shard lock is held while
        // awaiting record locks.
        let cells: Vec<(String, RecordCell)> = self
            .records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut rows = Vec::with_capacity(cells.len());
        for (provider, cell) in cells {
            let record = cell.read().await;
            rows.push((
                provider,
                record.score,
                record.tier,
                record.stats.total_services,
                record.stats.avg_quality,
                record.achievements.len(),
            ));
        }

        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        rows.truncate(limit);

        rows.into_iter()
            .enumerate()
            .map(
                |(i, (provider, score, tier, total_services, avg_quality, achievements))| {
                    LeaderboardRow {
                        rank: i + 1,
                        provider,
                        score,
                        tier,
                        total_services,
                        avg_quality,
                        achievements,
                    }
                },
            )
            .collect()
    }

    /// Aggregate counters across all providers
    pub async fn get_stats(&self) -> EngineStats {
        let cells: Vec<RecordCell> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        let mut stats = EngineStats {
            total_providers: cells.len(),
            total_services: 0,
            total_disputes: 0,
        };
        for cell in cells {
            let record = cell.read().await;
            stats.total_services += record.stats.total_services;
            stats.total_disputes += record.stats.disputed_services;
        }
        stats
    }
}

impl Default for ReputationStore {
    fn default() -> Self {
        Self::new(StoreSettings::default())
    }
}

/// Profile summary projection
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSummary {
    pub provider: String,
    pub score: u32,
    pub tier: TierInfo,
    pub stats: ProviderStats,
    pub achievements: Vec<AchievementInfo>,
    pub recent_history: Vec<HistoryEntry>,
}

/// One leaderboard row
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub provider: String,
    pub score: u32,
    pub tier: Tier,
    pub total_services: u64,
    pub avg_quality: f64,
    pub achievements: usize,
}

/// Store-wide aggregate counters
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub total_providers: usize,
    pub total_services: u64,
    pub total_disputes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reputation::achievements::Achievement;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn service(id: &str, quality: u8) -> ServiceOutcome {
        ServiceOutcome {
            service_id: id.to_string(),
            final_quality: quality,
            collateral_returned: 100.0,
            penalty_applied: 0.0,
            is_disputed: false,
        }
    }

    fn dispute(id: &str, fault: bool) -> DisputeOutcome {
        DisputeOutcome {
            service_id: id.to_string(),
            was_provider_fault: fault,
            refund_amount: 50.0,
        }
    }

    #[derive(Default)]
    struct MemoryRepository {
        records: Mutex<HashMap<String, ReputationRecord>>,
    }

    impl ReputationRepository for MemoryRepository {
        fn load(&self, provider: &str) -> Result<Option<ReputationRecord>> {
            Ok(self.records.lock().unwrap().get(provider).cloned())
        }

        fn save(&self, record: &ReputationRecord) -> Result<()> {
            self.records
                .lock()
                .unwrap()
                .insert(record.provider.clone(), record.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_fresh_provider_defaults() {
        let store = ReputationStore::default();
        let summary = store.get_summary("provider_1").await;
        assert_eq!(summary.score, 600);
        assert_eq!(summary.tier.name, "BEGINNER");
        assert!(summary.achievements.is_empty());
        assert!(summary.recent_history.is_empty());
    }

    #[tokio::test]
    async fn test_service_update_mutates_everything_atomically() {
        let store = ReputationStore::default();
        let record = store.update_after_service("provider_1", service("svc_1", 95)).await;

        assert_eq!(record.stats.total_services, 1);
        assert_eq!(record.stats.completed_services, 1);
        assert_eq!(record.stats.avg_quality, 95.0);
        assert_eq!(record.stats.total_collateral_earned, 100.0);
        assert!(record.stats.first_service_date.is_some());
        assert_eq!(record.tier, Tier::classify(record.score));
        assert!(record.achievements.contains(&Achievement::FirstService));

        let entry = record.history.last().unwrap();
        assert_eq!(entry.action, HistoryAction::ServiceCompleted);
        assert_eq!(entry.old_score, 600);
        assert_eq!(entry.new_score, record.score);
        assert_eq!(entry.quality, Some(95));
    }

    #[tokio::test]
    async fn test_dispute_applies_flat_penalty() {
        let store = ReputationStore::default();

        let record = store.update_after_dispute("provider_1", dispute("svc_1", true)).await;
        assert_eq!(record.score, 500); // 600 - 100
        assert_eq!(record.stats.disputed_services, 1);
        assert_eq!(record.history.last().unwrap().action, HistoryAction::DisputeLost);
        assert_eq!(record.history.last().unwrap().score_delta, -100);

        let record = store.update_after_dispute("provider_1", dispute("svc_2", false)).await;
        assert_eq!(record.score, 480); // 500 - 20
        assert_eq!(record.history.last().unwrap().action, HistoryAction::DisputeWon);
        assert_eq!(record.history.last().unwrap().score_delta, -20);
    }

    #[tokio::test]
    async fn test_dispute_penalty_floors_at_zero() {
        let store = ReputationStore::default();
        let mut record = store.get_record("provider_1").await;
        for i in 0..7 {
            record = store
                .update_after_dispute("provider_1", dispute(&format!("svc_{}", i), true))
                .await;
        }
        assert_eq!(record.score, 0);
        // the final entry only gives back what was left
        assert_eq!(record.history.last().unwrap().score_delta, 0);
    }

    #[tokio::test]
    async fn test_concurrent_writers_lose_no_updates() {
        let store = Arc::new(ReputationStore::default());

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update_after_service("provider_1", service(&format!("svc_{}", i), 90))
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let record = store.get_record("provider_1").await;
        assert_eq!(record.stats.total_services, 32);
        assert_eq!(record.stats.quality_history.len(), 32);
        assert_eq!(record.history.len(), 32);
    }

    #[tokio::test]
    async fn test_leaderboard_sorted_with_deterministic_tie_break() {
        let store = ReputationStore::default();

        // three providers with distinct scores via disputes
        store.update_after_dispute("provider_c", dispute("svc_1", true)).await; // 500
        store.update_after_dispute("provider_a", dispute("svc_2", false)).await; // 580
        store.get_record("provider_b").await; // 600

        let board = store.get_leaderboard(Some(10)).await;
        let scores: Vec<u32> = board.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![600, 580, 500]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[2].rank, 3);

        // ties break on provider key ascending
        store.get_record("provider_z").await; // also 600
        let board = store.get_leaderboard(Some(10)).await;
        assert_eq!(board[0].provider, "provider_b");
        assert_eq!(board[1].provider, "provider_z");
    }

    #[tokio::test]
    async fn test_leaderboard_truncates_to_limit() {
        let store = ReputationStore::default();
        for i in 0..5 {
            store.get_record(&format!("provider_{}", i)).await;
        }
        assert_eq!(store.get_leaderboard(Some(3)).await.len(), 3);
    }

    #[tokio::test]
    async fn test_repository_round_trip() {
        let repository = Arc::new(MemoryRepository::default());

        {
            let store =
                ReputationStore::default().with_repository(repository.clone());
            store.update_after_service("provider_1", service("svc_1", 88)).await;
        }

        // a fresh store hydrates from the repository on first reference
        let store = ReputationStore::default().with_repository(repository);
        let record = store.get_record("provider_1").await;
        assert_eq!(record.stats.total_services, 1);
        assert_eq!(record.stats.avg_quality, 88.0);
    }

    #[tokio::test]
    async fn test_engine_stats_aggregate() {
        let store = ReputationStore::default();
        store.update_after_service("provider_1", service("svc_1", 90)).await;
        store.update_after_service("provider_2", service("svc_2", 90)).await;
        store.update_after_dispute("provider_2", dispute("svc_3", true)).await;

        let stats = store.get_stats().await;
        assert_eq!(stats.total_providers, 2);
        assert_eq!(stats.total_services, 2);
        assert_eq!(stats.total_disputes, 1);
    }
}
