//! Reputation API Endpoints
//!
//! HTTP surface for the reputation engine: settlement callers post
//! finalized service and dispute outcomes, presentation layers read
//! summaries, the leaderboard, and static tier/achievement metadata.
//!
//! The core treats `final_quality` in 0..=100 as a caller contract; this
//! boundary clamps defensively instead of rejecting.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::reputation::{
    achievement_info, tier_info, AchievementInfo, DisputeOutcome, EngineStats, LeaderboardRow,
    ProviderSummary, ReputationRecord, ReputationStore, ServiceOutcome, TierInfo,
};

/// API state for reputation endpoints
#[derive(Clone)]
pub struct ReputationApiState {
    pub store: Arc<ReputationStore>,
}

// Request types

#[derive(Debug, Deserialize)]
pub struct ServiceCompletedRequest {
    pub service_id: String,
    pub final_quality: i64,
    pub collateral_returned: f64,
    pub penalty_applied: f64,
    #[serde(default)]
    pub is_disputed: bool,
}

#[derive(Debug, Deserialize)]
pub struct DisputeResolvedRequest {
    pub service_id: String,
    pub was_provider_fault: bool,
    #[serde(default)]
    pub refund_amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

// Response types

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub total: usize,
    pub entries: Vec<LeaderboardRow>,
}

// Endpoints

/// POST /reputation/{provider}/service - Record a finalized service
pub async fn post_service_outcome(
    State(state): State<ReputationApiState>,
    Path(provider): Path<String>,
    Json(payload): Json<ServiceCompletedRequest>,
) -> Json<ReputationRecord> {
    let outcome = ServiceOutcome {
        service_id: payload.service_id,
        final_quality: payload.final_quality.clamp(0, 100) as u8,
        collateral_returned: payload.collateral_returned.max(0.0),
        penalty_applied: payload.penalty_applied.max(0.0),
        is_disputed: payload.is_disputed,
    };

    let record = state.store.update_after_service(&provider, outcome).await;
    Json(record)
}

/// POST /reputation/{provider}/dispute - Record a resolved dispute
pub async fn post_dispute_outcome(
    State(state): State<ReputationApiState>,
    Path(provider): Path<String>,
    Json(payload): Json<DisputeResolvedRequest>,
) -> Json<ReputationRecord> {
    let outcome = DisputeOutcome {
        service_id: payload.service_id,
        was_provider_fault: payload.was_provider_fault,
        refund_amount: payload.refund_amount,
    };

    let record = state.store.update_after_dispute(&provider, outcome).await;
    Json(record)
}

/// GET /reputation/{provider} - Profile summary
pub async fn get_summary(
    State(state): State<ReputationApiState>,
    Path(provider): Path<String>,
) -> Json<ProviderSummary> {
    Json(state.store.get_summary(&provider).await)
}

/// GET /reputation/leaderboard?limit=N - Ranked providers
pub async fn get_leaderboard(
    State(state): State<ReputationApiState>,
    Query(query): Query<LeaderboardQuery>,
) -> Json<LeaderboardResponse> {
    let entries = state.store.get_leaderboard(query.limit).await;
    Json(LeaderboardResponse {
        total: entries.len(),
        entries,
    })
}

/// GET /reputation/stats - Engine-wide counters
pub async fn get_stats(State(state): State<ReputationApiState>) -> Json<EngineStats> {
    Json(state.store.get_stats().await)
}

/// GET /reputation/tiers/{name} - Tier metadata (generic fallback for
/// unknown names, never an error)
pub async fn get_tier_info(Path(name): Path<String>) -> Json<TierInfo> {
    Json(tier_info(&name))
}

/// GET /reputation/achievements/{id} - Achievement metadata (generic
/// fallback for unknown identifiers, never an error)
pub async fn get_achievement_info(Path(id): Path<String>) -> Json<AchievementInfo> {
    Json(achievement_info(&id))
}

/// Create the reputation API router
pub fn create_reputation_router(state: ReputationApiState) -> Router {
    Router::new()
        .route("/leaderboard", get(get_leaderboard))
        .route("/stats", get(get_stats))
        .route("/tiers/{name}", get(get_tier_info))
        .route("/achievements/{id}", get(get_achievement_info))
        .route("/{provider}", get(get_summary))
        .route("/{provider}/service", post(post_service_outcome))
        .route("/{provider}/dispute", post(post_dispute_outcome))
        .with_state(state)
}
