//! HTTP API endpoints for the reputation engine
//!
//! Provides REST APIs for:
//! - Settlement callers (finalized services, resolved disputes)
//! - Profile summaries and the leaderboard
//! - Static tier and achievement metadata lookups

pub mod reputation;

pub use reputation::{create_reputation_router, ReputationApiState};
