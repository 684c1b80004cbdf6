//! Configuration management
//!
//! All configuration is loaded from `REPUTATION_*` environment variables on
//! top of defaults; values that fail to parse abort startup with context.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

use crate::reputation::{StoreSettings, INITIAL_SCORE, MAX_SCORE};

/// Configuration for the reputation engine server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Reputation store configuration
    pub reputation: ReputationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Enable request/response span logging
    pub log_requests: bool,
}

/// Tuning for the reputation store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationConfig {
    /// Score assigned to a provider before any service is recorded
    pub initial_score: u32,
    /// Retained per-provider quality values
    pub quality_window: usize,
    /// Retained per-provider history entries
    pub history_window: usize,
    /// Leaderboard size when no limit is passed
    pub default_leaderboard_limit: usize,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            initial_score: INITIAL_SCORE,
            quality_window: 50,
            history_window: 100,
            default_leaderboard_limit: 100,
        }
    }
}

impl ReputationConfig {
    /// Convert to StoreSettings for use by ReputationStore
    pub fn to_settings(&self) -> StoreSettings {
        StoreSettings {
            initial_score: self.initial_score,
            quality_window: self.quality_window,
            history_window: self.history_window,
            default_leaderboard_limit: self.default_leaderboard_limit,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8780,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                log_requests: false,
            },
            reputation: ReputationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables and validate it
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Server configuration
        if let Ok(host) = env::var("REPUTATION_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = env::var("REPUTATION_PORT") {
            config.server.port = port.parse().context("Invalid REPUTATION_PORT value")?;
        }

        // Logging configuration
        if let Ok(level) = env::var("REPUTATION_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(log_requests) = env::var("REPUTATION_LOG_REQUESTS") {
            config.logging.log_requests = log_requests
                .parse()
                .context("Invalid REPUTATION_LOG_REQUESTS value")?;
        }

        // Reputation store configuration
        if let Ok(score) = env::var("REPUTATION_INITIAL_SCORE") {
            config.reputation.initial_score = score
                .parse()
                .context("Invalid REPUTATION_INITIAL_SCORE value")?;
        }

        if let Ok(window) = env::var("REPUTATION_QUALITY_WINDOW") {
            config.reputation.quality_window = window
                .parse()
                .context("Invalid REPUTATION_QUALITY_WINDOW value")?;
        }

        if let Ok(window) = env::var("REPUTATION_HISTORY_WINDOW") {
            config.reputation.history_window = window
                .parse()
                .context("Invalid REPUTATION_HISTORY_WINDOW value")?;
        }

        if let Ok(limit) = env::var("REPUTATION_LEADERBOARD_LIMIT") {
            config.reputation.default_leaderboard_limit = limit
                .parse()
                .context("Invalid REPUTATION_LEADERBOARD_LIMIT value")?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.reputation.initial_score > MAX_SCORE {
            return Err(anyhow::anyhow!(
                "Initial score {} exceeds the score ceiling {}",
                self.reputation.initial_score,
                MAX_SCORE
            ));
        }

        // consistency and achievement streak checks read the last 10 values
        if self.reputation.quality_window < 10 {
            return Err(anyhow::anyhow!(
                "Quality window {} is too small (minimum 10)",
                self.reputation.quality_window
            ));
        }

        // profile summaries surface the 5 newest history entries
        if self.reputation.history_window < 5 {
            return Err(anyhow::anyhow!(
                "History window {} is too small (minimum 5)",
                self.reputation.history_window
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reputation.initial_score, 600);
    }

    #[test]
    fn test_initial_score_ceiling_enforced() {
        let mut config = EngineConfig::default();
        config.reputation.initial_score = 1200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quality_window_floor_enforced() {
        let mut config = EngineConfig::default();
        config.reputation.quality_window = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_history_window_floor_enforced() {
        // a zero window would silently discard every event log entry
        let mut config = EngineConfig::default();
        config.reputation.history_window = 0;
        assert!(config.validate().is_err());

        config.reputation.history_window = 5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_to_settings_carries_all_fields() {
        let config = ReputationConfig {
            initial_score: 500,
            quality_window: 25,
            history_window: 40,
            default_leaderboard_limit: 10,
        };
        let settings = config.to_settings();
        assert_eq!(settings.initial_score, 500);
        assert_eq!(settings.quality_window, 25);
        assert_eq!(settings.history_window, 40);
        assert_eq!(settings.default_leaderboard_limit, 10);
    }
}
