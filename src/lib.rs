//! Credence: explainable credibility scoring for text content
//!
//! This library scores a block of text (and an optional source URL) against a
//! transparent rule table and returns a score, a verdict, and the evidence
//! behind both. Everything around the engine (config, history, the stdio
//! gateway, reporters) lives in its own module and never feeds back into
//! scoring.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod gateway;
pub mod history;
pub mod reporter;

pub use analyzer::{RuleSet, ScoringEngine};
pub use error::{HistoryError, ScoringError};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Input to a single scoring call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringInput {
    /// Text to score
    pub text: String,
    /// Where the text came from, if known
    #[serde(default)]
    pub source_url: Option<String>,
}

impl ScoringInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_url: None,
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Source URL, or `None` when absent or empty
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref().filter(|u| !u.is_empty())
    }
}

/// Category of rule that produced a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    SensationalLanguage,
    CredibleLanguage,
    TrustedSourceMention,
    UntrustedSourceMention,
    ExcessiveCaps,
    ExcessivePunctuation,
    LinkSpam,
    EmotionalLanguage,
    TrustedDomain,
    UntrustedDomain,
}

impl RuleCategory {
    /// Every category, in evaluation order
    pub const ALL: [RuleCategory; 10] = [
        RuleCategory::SensationalLanguage,
        RuleCategory::CredibleLanguage,
        RuleCategory::TrustedSourceMention,
        RuleCategory::UntrustedSourceMention,
        RuleCategory::ExcessiveCaps,
        RuleCategory::ExcessivePunctuation,
        RuleCategory::LinkSpam,
        RuleCategory::EmotionalLanguage,
        RuleCategory::TrustedDomain,
        RuleCategory::UntrustedDomain,
    ];

    /// Source hits land in `sources`; everything else in `indicators`
    pub fn is_source(self) -> bool {
        matches!(
            self,
            RuleCategory::TrustedSourceMention
                | RuleCategory::UntrustedSourceMention
                | RuleCategory::TrustedDomain
                | RuleCategory::UntrustedDomain
        )
    }

    /// Stable kebab-case identifier used in config files
    pub fn id(self) -> &'static str {
        match self {
            RuleCategory::SensationalLanguage => "sensational-language",
            RuleCategory::CredibleLanguage => "credible-language",
            RuleCategory::TrustedSourceMention => "trusted-source-mention",
            RuleCategory::UntrustedSourceMention => "untrusted-source-mention",
            RuleCategory::ExcessiveCaps => "excessive-caps",
            RuleCategory::ExcessivePunctuation => "excessive-punctuation",
            RuleCategory::LinkSpam => "link-spam",
            RuleCategory::EmotionalLanguage => "emotional-language",
            RuleCategory::TrustedDomain => "trusted-domain",
            RuleCategory::UntrustedDomain => "untrusted-domain",
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleCategory::ALL
            .iter()
            .copied()
            .find(|c| c.id() == s)
            .ok_or_else(|| format!("unknown rule category: {}", s))
    }
}

/// One piece of evidence: which rule fired, by how much, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleHit {
    pub category: RuleCategory,
    /// Signed score adjustment
    pub delta: i32,
    /// Human-readable explanation, already filled with the matched token
    pub message: String,
}

impl RuleHit {
    pub fn new(category: RuleCategory, delta: i32, message: impl Into<String>) -> Self {
        Self {
            category,
            delta,
            message: message.into(),
        }
    }
}

/// Three-way classification of a scored text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "LIKELY REAL")]
    LikelyReal,
    #[serde(rename = "UNCERTAIN")]
    Uncertain,
    #[serde(rename = "LIKELY FAKE")]
    LikelyFake,
}

impl Verdict {
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => Verdict::LikelyReal,
            50..=69 => Verdict::Uncertain,
            _ => Verdict::LikelyFake,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::LikelyReal => "LIKELY REAL",
            Verdict::Uncertain => "UNCERTAIN",
            Verdict::LikelyFake => "LIKELY FAKE",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of scoring one piece of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    /// Final score (0-100), after the source URL adjustment
    pub credibility_score: u8,
    /// Verdict, decided before the source URL adjustment
    pub verdict: Verdict,
    /// Fixed explanatory sentence for the verdict
    pub analysis: String,
    /// Messages from language and style hits
    pub indicators: Vec<String>,
    /// Messages from source-name and domain hits
    pub sources: Vec<String>,
    /// Character count of the lower-cased text that was scored
    pub content_length: usize,
    /// Echo of the input URL, empty when none was given
    pub source_url: String,
    /// Clamped score the verdict was computed from
    pub pre_source_score: u8,
    /// Structured evidence, in evaluation order
    #[serde(default)]
    pub hits: Vec<RuleHit>,
}
