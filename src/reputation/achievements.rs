//! Achievement Unlocking
//!
//! Achievements are one-way flags: each rule is a pure predicate over
//! record state, checked after every score recompute, and an identifier
//! once unlocked is never removed even if its condition later stops
//! holding (a provider keeps MASTER_TIER after dropping below 900).
//!
//! Count-based milestones (VETERAN_10 etc.) are edge-triggered on the
//! exact count, not "at least", so they fire exactly once by construction.

use serde::{Deserialize, Serialize};

use crate::reputation::record::ReputationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Achievement {
    FirstService,
    #[serde(rename = "VETERAN_10")]
    Veteran10,
    #[serde(rename = "VETERAN_50")]
    Veteran50,
    Centurion,
    Perfectionist,
    ConsistentExcellence,
    DisputeFree,
    MasterTier,
    LegendaryTier,
}

impl Achievement {
    pub const ALL: [Achievement; 9] = [
        Achievement::FirstService,
        Achievement::Veteran10,
        Achievement::Veteran50,
        Achievement::Centurion,
        Achievement::Perfectionist,
        Achievement::ConsistentExcellence,
        Achievement::DisputeFree,
        Achievement::MasterTier,
        Achievement::LegendaryTier,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Achievement::FirstService => "FIRST_SERVICE",
            Achievement::Veteran10 => "VETERAN_10",
            Achievement::Veteran50 => "VETERAN_50",
            Achievement::Centurion => "CENTURION",
            Achievement::Perfectionist => "PERFECTIONIST",
            Achievement::ConsistentExcellence => "CONSISTENT_EXCELLENCE",
            Achievement::DisputeFree => "DISPUTE_FREE",
            Achievement::MasterTier => "MASTER_TIER",
            Achievement::LegendaryTier => "LEGENDARY_TIER",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Achievement::FirstService => "First Steps",
            Achievement::Veteran10 => "Veteran",
            Achievement::Veteran50 => "Seasoned Professional",
            Achievement::Centurion => "Centurion",
            Achievement::Perfectionist => "Perfectionist",
            Achievement::ConsistentExcellence => "Consistent Excellence",
            Achievement::DisputeFree => "Clean Record",
            Achievement::MasterTier => "Master",
            Achievement::LegendaryTier => "Legend",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Achievement::FirstService => "🚀",
            Achievement::Veteran10 => "🎖️",
            Achievement::Veteran50 => "🏅",
            Achievement::Centurion => "💯",
            Achievement::Perfectionist => "✨",
            Achievement::ConsistentExcellence => "📈",
            Achievement::DisputeFree => "🛡️",
            Achievement::MasterTier => "💎",
            Achievement::LegendaryTier => "👑",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::FirstService => "Completed a first service",
            Achievement::Veteran10 => "Completed 10 services",
            Achievement::Veteran50 => "Completed 50 services",
            Achievement::Centurion => "Completed 100 services",
            Achievement::Perfectionist => "Delivered a perfect quality score",
            Achievement::ConsistentExcellence => "Last 10 services all rated 90 or above",
            Achievement::DisputeFree => "50+ services without a single dispute",
            Achievement::MasterTier => "Reached a reputation score of 900",
            Achievement::LegendaryTier => "Reached a reputation score of 950",
        }
    }

    pub fn from_id(id: &str) -> Option<Achievement> {
        Achievement::ALL.iter().copied().find(|a| a.id() == id)
    }

    /// Whether this achievement's condition holds for the record right now
    fn condition_met(&self, record: &ReputationRecord) -> bool {
        let stats = &record.stats;
        match self {
            Achievement::FirstService => stats.total_services == 1,
            Achievement::Veteran10 => stats.total_services == 10,
            Achievement::Veteran50 => stats.total_services == 50,
            Achievement::Centurion => stats.total_services == 100,
            Achievement::Perfectionist => stats.quality_history.contains(&100),
            Achievement::ConsistentExcellence => {
                stats.quality_history.len() >= 10
                    && stats
                        .quality_history
                        .iter()
                        .rev()
                        .take(10)
                        .all(|&q| q >= 90)
            }
            Achievement::DisputeFree => {
                stats.total_services >= 50 && stats.disputed_services == 0
            }
            Achievement::MasterTier => record.score >= 900,
            Achievement::LegendaryTier => record.score >= 950,
        }
    }
}

/// Evaluate all unlock rules against the record, returning only the
/// achievements not already present. Idempotent: re-running against an
/// unchanged record yields nothing new.
pub fn evaluate(record: &ReputationRecord) -> Vec<Achievement> {
    Achievement::ALL
        .iter()
        .copied()
        .filter(|a| !record.achievements.contains(a) && a.condition_met(record))
        .collect()
}

/// Presentation metadata for an achievement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementInfo {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
}

impl From<Achievement> for AchievementInfo {
    fn from(achievement: Achievement) -> Self {
        Self {
            id: achievement.id().to_string(),
            name: achievement.name().to_string(),
            icon: achievement.icon().to_string(),
            description: achievement.description().to_string(),
        }
    }
}

/// Look up achievement metadata by identifier. Unknown identifiers get a
/// generic placeholder rather than an error.
pub fn achievement_info(id: &str) -> AchievementInfo {
    match Achievement::from_id(id) {
        Some(achievement) => achievement.into(),
        None => AchievementInfo {
            id: id.to_string(),
            name: "Unknown Achievement".to_string(),
            icon: "❔".to_string(),
            description: "No metadata recorded for this achievement".to_string(),
        },
    }
}
