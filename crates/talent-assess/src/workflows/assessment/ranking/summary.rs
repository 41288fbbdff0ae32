use serde::Serialize;

use super::RankedEntry;
use crate::workflows::assessment::scoring::ScoreBand;

/// Aggregates shown above a leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LeaderboardSummary {
    pub candidates: usize,
    /// Scoring at least 80%.
    pub excellent: usize,
    /// Scoring at least 60%, excellent ones included.
    pub passing: usize,
    /// Scoring below 60%.
    pub needs_review: usize,
    pub mean_percentage: u32,
    /// Share of candidates passing, as a rounded percent.
    pub pass_rate: u32,
}

impl LeaderboardSummary {
    pub fn from_entries(entries: &[RankedEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let count = entries.len();
        let at_least = |threshold: u32| {
            entries
                .iter()
                .filter(|entry| entry.score.percentage >= threshold)
                .count()
        };
        let excellent = at_least(ScoreBand::EXCELLENT_FROM);
        let passing = at_least(ScoreBand::PASS_FROM);
        let sum: u64 = entries
            .iter()
            .map(|entry| u64::from(entry.score.percentage))
            .sum();

        Self {
            candidates: count,
            excellent,
            passing,
            needs_review: count - passing,
            mean_percentage: (sum as f64 / count as f64).round() as u32,
            pass_rate: (passing as f64 / count as f64 * 100.0).round() as u32,
        }
    }
}
