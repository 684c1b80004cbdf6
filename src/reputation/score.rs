//! Score Formula and Consistency Estimator
//!
//! The reputation score combines five sub-scores, each normalized to
//! [0, 1000], with fixed weights summing to 1.0:
//!
//! | Sub-score    | Weight | Source                                      |
//! |--------------|--------|---------------------------------------------|
//! | quality      | 0.40   | avg_quality / 100 * 1000                    |
//! | completion   | 0.25   | completed / total * 1000                    |
//! | consistency  | 0.15   | inverse std-dev of recent quality values    |
//! | dispute      | 0.15   | 1000 * (1 - dispute_rate * 5), floored at 0 |
//! | longevity    | 0.05   | capped at 100 raw points (max +5 weighted)  |
//!
//! All functions here are pure; callers supply stats that already
//! incorporate the new event.

use chrono::{DateTime, Utc};

use crate::reputation::record::{ProviderStats, INITIAL_SCORE, MAX_SCORE};

const WEIGHT_QUALITY: f64 = 0.40;
const WEIGHT_COMPLETION: f64 = 0.25;
const WEIGHT_CONSISTENCY: f64 = 0.15;
const WEIGHT_DISPUTE: f64 = 0.15;
const WEIGHT_LONGEVITY: f64 = 0.05;

/// A standard deviation at or above this zeroes the consistency sub-score
const CONSISTENCY_STDDEV_CEILING: f64 = 20.0;

/// Compute the weighted reputation score from current stats.
///
/// Returns the initial score when no services have been recorded, so the
/// completion and dispute ratios never divide by zero.
pub fn compute_score(stats: &ProviderStats, now: DateTime<Utc>) -> u32 {
    if stats.total_services == 0 {
        return INITIAL_SCORE;
    }

    let total = stats.total_services as f64;

    let quality = stats.avg_quality / 100.0 * 1000.0;
    let completion = stats.completed_services as f64 / total * 1000.0;
    let consistency = consistency_score(&stats.quality_history);

    let dispute_rate = stats.disputed_services as f64 / total;
    let dispute = (1000.0 * (1.0 - dispute_rate * 5.0)).max(0.0);

    let longevity = stats
        .first_service_date
        .map(|first| {
            let days = ((now - first).num_seconds() as f64 / 86_400.0).max(0.0);
            (days / 365.0 * 100.0).min(100.0)
        })
        .unwrap_or(0.0);

    let weighted = quality * WEIGHT_QUALITY
        + completion * WEIGHT_COMPLETION
        + consistency * WEIGHT_CONSISTENCY
        + dispute * WEIGHT_DISPUTE
        + longevity * WEIGHT_LONGEVITY;

    weighted.round().clamp(0.0, MAX_SCORE as f64) as u32
}

/// Consistency as an inverse measure of quality dispersion.
///
/// Fewer than 2 samples yields 1000 (nothing to penalize). A population
/// standard deviation of 0 yields 1000, 20 or more yields 0, linear in
/// between.
pub fn consistency_score(quality_history: &[u8]) -> f64 {
    if quality_history.len() < 2 {
        return 1000.0;
    }

    let n = quality_history.len() as f64;
    let mean = quality_history.iter().map(|&q| q as f64).sum::<f64>() / n;
    let variance = quality_history
        .iter()
        .map(|&q| (q as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();

    (1000.0 - (std_dev / CONSISTENCY_STDDEV_CEILING) * 1000.0).max(0.0)
}
