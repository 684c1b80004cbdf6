//! Tier Classification
//!
//! Tiers are a pure function of the score: thresholds are evaluated from
//! the highest down and the first match wins. A record's tier is
//! reclassified on every mutation and never stored independently of the
//! score that produced it.

use serde::{Deserialize, Serialize};

/// Named reputation bracket derived solely from the numeric score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Legendary,
    Master,
    Expert,
    Professional,
    Intermediate,
    Beginner,
}

impl Tier {
    /// Classify a score, highest threshold first
    pub fn classify(score: u32) -> Tier {
        match score {
            s if s >= 950 => Tier::Legendary,
            s if s >= 900 => Tier::Master,
            s if s >= 850 => Tier::Expert,
            s if s >= 800 => Tier::Professional,
            s if s >= 700 => Tier::Intermediate,
            _ => Tier::Beginner,
        }
    }

    /// Minimum score for this tier
    pub fn min_score(&self) -> u32 {
        match self {
            Tier::Legendary => 950,
            Tier::Master => 900,
            Tier::Expert => 850,
            Tier::Professional => 800,
            Tier::Intermediate => 700,
            Tier::Beginner => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Legendary => "LEGENDARY",
            Tier::Master => "MASTER",
            Tier::Expert => "EXPERT",
            Tier::Professional => "PROFESSIONAL",
            Tier::Intermediate => "INTERMEDIATE",
            Tier::Beginner => "BEGINNER",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Tier::Legendary => "#ffd700",
            Tier::Master => "#9b59b6",
            Tier::Expert => "#3498db",
            Tier::Professional => "#2ecc71",
            Tier::Intermediate => "#f39c12",
            Tier::Beginner => "#95a5a6",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Tier::Legendary => "👑",
            Tier::Master => "💎",
            Tier::Expert => "🏆",
            Tier::Professional => "⭐",
            Tier::Intermediate => "🔰",
            Tier::Beginner => "🌱",
        }
    }

    /// Parse a tier name, case-insensitive
    pub fn from_name(name: &str) -> Option<Tier> {
        match name.to_uppercase().as_str() {
            "LEGENDARY" => Some(Tier::Legendary),
            "MASTER" => Some(Tier::Master),
            "EXPERT" => Some(Tier::Expert),
            "PROFESSIONAL" => Some(Tier::Professional),
            "INTERMEDIATE" => Some(Tier::Intermediate),
            "BEGINNER" => Some(Tier::Beginner),
            _ => None,
        }
    }
}

/// Presentation metadata for a tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierInfo {
    pub name: String,
    pub color: String,
    pub badge: String,
    pub min: u32,
}

impl From<Tier> for TierInfo {
    fn from(tier: Tier) -> Self {
        Self {
            name: tier.name().to_string(),
            color: tier.color().to_string(),
            badge: tier.badge().to_string(),
            min: tier.min_score(),
        }
    }
}

/// Look up tier metadata by name. Unknown names get a generic placeholder
/// rather than an error.
pub fn tier_info(name: &str) -> TierInfo {
    match Tier::from_name(name) {
        Some(tier) => tier.into(),
        None => TierInfo {
            name: name.to_uppercase(),
            color: "#cccccc".to_string(),
            badge: "❔".to_string(),
            min: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(Tier::classify(1000), Tier::Legendary);
        assert_eq!(Tier::classify(950), Tier::Legendary);
        assert_eq!(Tier::classify(949), Tier::Master);
        assert_eq!(Tier::classify(900), Tier::Master);
        assert_eq!(Tier::classify(899), Tier::Expert);
        assert_eq!(Tier::classify(850), Tier::Expert);
        assert_eq!(Tier::classify(849), Tier::Professional);
        assert_eq!(Tier::classify(800), Tier::Professional);
        assert_eq!(Tier::classify(799), Tier::Intermediate);
        assert_eq!(Tier::classify(750), Tier::Intermediate);
        assert_eq!(Tier::classify(700), Tier::Intermediate);
        assert_eq!(Tier::classify(699), Tier::Beginner);
        assert_eq!(Tier::classify(0), Tier::Beginner);
    }

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(Tier::from_name("legendary"), Some(Tier::Legendary));
        assert_eq!(Tier::from_name("Master"), Some(Tier::Master));
        assert_eq!(Tier::from_name("nope"), None);
    }

    #[test]
    fn test_unknown_tier_gets_placeholder() {
        let info = tier_info("mythic");
        assert_eq!(info.name, "MYTHIC");
        assert_eq!(info.min, 0);
    }
}
