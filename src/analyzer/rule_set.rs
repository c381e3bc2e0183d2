//! Rule tables injected into the engine

use crate::RuleCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_UNRELIABLE_PHRASES: &[&str] = &[
    "shocking",
    "unbelievable",
    "you won't believe",
    "doctors hate",
    "they don't want you to know",
    "secret",
    "exposed",
    "coverup",
];

pub const DEFAULT_RELIABLE_PHRASES: &[&str] = &[
    "study shows",
    "according to",
    "researchers found",
    "data indicates",
    "evidence suggests",
    "verified by",
    "confirmed by",
];

pub const DEFAULT_TRUSTED_SOURCES: &[&str] = &[
    "BBC",
    "Reuters",
    "AP News",
    "NPR",
    "The Guardian",
    "Associated Press",
    "Bloomberg",
    "Financial Times",
];

pub const DEFAULT_UNTRUSTED_SOURCES: &[&str] = &[
    "unknown source",
    "anonymous source",
    "viral posts",
    "social media claims",
];

pub const DEFAULT_EMOTIONAL_WORDS: &[&str] = &[
    "angry",
    "furious",
    "devastated",
    "shocking",
    "heartbreaking",
    "amazing",
];

pub const DEFAULT_TRUSTED_DOMAINS: &[&str] = &[
    "bbc.com",
    "reuters.com",
    "apnews.com",
    "npr.org",
    "theguardian.com",
    "bloomberg.com",
];

pub const DEFAULT_UNTRUSTED_DOMAINS: &[&str] = &["clickbait.com", "fakenews.com", "conspiracy.com"];

/// Immutable rule tables used by one engine.
///
/// Matching lists are lower-cased by [`RuleSet::normalized`]. Trusted source
/// names keep their configured casing because it is echoed in messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    pub unreliable_phrases: Vec<String>,
    pub reliable_phrases: Vec<String>,
    pub trusted_sources: Vec<String>,
    pub untrusted_sources: Vec<String>,
    pub emotional_words: Vec<String>,
    pub trusted_domains: Vec<String>,
    pub untrusted_domains: Vec<String>,
    /// Categories that produce no hits
    #[serde(default)]
    pub disabled: BTreeSet<RuleCategory>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            unreliable_phrases: owned(DEFAULT_UNRELIABLE_PHRASES),
            reliable_phrases: owned(DEFAULT_RELIABLE_PHRASES),
            trusted_sources: owned(DEFAULT_TRUSTED_SOURCES),
            untrusted_sources: owned(DEFAULT_UNTRUSTED_SOURCES),
            emotional_words: owned(DEFAULT_EMOTIONAL_WORDS),
            trusted_domains: owned(DEFAULT_TRUSTED_DOMAINS),
            untrusted_domains: owned(DEFAULT_UNTRUSTED_DOMAINS),
            disabled: BTreeSet::new(),
        }
    }
}

impl RuleSet {
    /// Disable a category
    pub fn without(mut self, category: RuleCategory) -> Self {
        self.disabled.insert(category);
        self
    }

    pub fn is_enabled(&self, category: RuleCategory) -> bool {
        !self.disabled.contains(&category)
    }

    /// Trim entries, drop empty ones, lower-case matching lists and collapse
    /// duplicates (first occurrence wins).
    pub fn normalized(self) -> Self {
        Self {
            unreliable_phrases: lowered_unique(self.unreliable_phrases),
            reliable_phrases: lowered_unique(self.reliable_phrases),
            trusted_sources: cased_unique(self.trusted_sources),
            untrusted_sources: lowered_unique(self.untrusted_sources),
            emotional_words: lowered_unique(self.emotional_words),
            trusted_domains: lowered_unique(self.trusted_domains),
            untrusted_domains: lowered_unique(self.untrusted_domains),
            disabled: self.disabled,
        }
    }
}

fn lowered_unique(list: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    list.into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}

// Empty names would match every text.
fn cased_unique(list: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    list.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
        .collect()
}
