//! Analyzer module - credibility scoring engine

pub mod engine;
pub mod rule_set;
pub mod rules;
pub mod scoring;

pub use engine::ScoringEngine;
pub use rule_set::RuleSet;
pub use scoring::{AggregateStats, ScoreCalculator};
