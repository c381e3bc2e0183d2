//! Score arithmetic, verdict text, and aggregate statistics

use crate::{RuleHit, ScoringResult, Verdict};
use serde::{Deserialize, Serialize};

/// Starting point before any rule fires
pub const NEUTRAL_SCORE: i32 = 50;
pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// Calculator for credibility scores
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Restrict a raw score to 0-100
    pub fn clamp(raw: i32) -> u8 {
        raw.clamp(MIN_SCORE, MAX_SCORE) as u8
    }

    /// Apply hit deltas on top of `start` and clamp
    pub fn apply(start: u8, hits: &[RuleHit]) -> u8 {
        let raw = hits.iter().fold(start as i32, |acc, hit| acc + hit.delta);
        Self::clamp(raw)
    }

    /// Fixed sentence shown with each verdict
    pub fn analysis_for(verdict: Verdict) -> &'static str {
        match verdict {
            Verdict::LikelyReal => {
                "This content appears to be from credible sources with factual language. Verify with official sources."
            }
            Verdict::Uncertain => {
                "This content has mixed indicators. Cross-reference with multiple sources before sharing."
            }
            Verdict::LikelyFake => {
                "This content shows patterns common in misinformation. Be cautious about sharing."
            }
        }
    }

    /// Summarize many results: counts per verdict and the mean score
    pub fn aggregate<'a, I>(results: I) -> AggregateStats
    where
        I: IntoIterator<Item = &'a ScoringResult>,
    {
        let mut stats = AggregateStats::default();
        let mut total_score: u64 = 0;
        for result in results {
            stats.total += 1;
            total_score += result.credibility_score as u64;
            match result.verdict {
                Verdict::LikelyReal => stats.likely_real += 1,
                Verdict::Uncertain => stats.uncertain += 1,
                Verdict::LikelyFake => stats.likely_fake += 1,
            }
        }
        if stats.total > 0 {
            stats.average_score = total_score as f64 / stats.total as f64;
        }
        stats
    }
}

/// Aggregate statistics over a set of results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total: usize,
    pub likely_real: usize,
    pub uncertain: usize,
    pub likely_fake: usize,
    /// Mean final score, 0 when there are no results
    pub average_score: f64,
}
