//! Scoring rules for credibility analysis

pub mod domain;
pub mod keywords;
pub mod sources;
pub mod style;

pub use domain::SourceDomainRule;
pub use keywords::{CredibleLanguageRule, SensationalLanguageRule};
pub use sources::{TrustedSourceRule, UntrustedSourceRule};
pub use style::{ExcessiveCapsRule, ExcessivePunctuationRule, EmotionalLanguageRule, LinkSpamRule};

use super::RuleSet;
use crate::{RuleCategory, RuleHit};

/// Text under analysis, in both casings
pub struct Content<'a> {
    /// Text exactly as submitted
    pub original: &'a str,
    /// Lower-cased copy used by every case-insensitive rule
    pub lowered: String,
}

impl<'a> Content<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            lowered: original.to_lowercase(),
        }
    }
}

/// Trait for text scoring rules
pub trait ContentRule: Send + Sync {
    /// Name of the rule
    fn name(&self) -> &'static str;

    /// Evaluate the content and return hits, in table order
    fn evaluate(&self, content: &Content<'_>, rules: &RuleSet) -> Vec<RuleHit>;
}

/// Shared pass for phrase tables: one hit per phrase present, however often
/// it occurs.
pub(crate) fn phrase_hits(
    haystack: &str,
    phrases: &[String],
    category: RuleCategory,
    delta: i32,
    message: impl Fn(&str) -> String,
) -> Vec<RuleHit> {
    phrases
        .iter()
        .filter(|phrase| haystack.contains(phrase.as_str()))
        .map(|phrase| RuleHit::new(category, delta, message(phrase)))
        .collect()
}
