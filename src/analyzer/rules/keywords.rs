//! Sensationalist and credible phrasing.

use super::{phrase_hits, Content, ContentRule};
use crate::analyzer::RuleSet;
use crate::{RuleCategory, RuleHit};

const SENSATIONAL_PENALTY: i32 = -8;
const CREDIBLE_BONUS: i32 = 5;

/// Rule for clickbait phrases ("you won't believe", "doctors hate", ...)
pub struct SensationalLanguageRule;

impl SensationalLanguageRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SensationalLanguageRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRule for SensationalLanguageRule {
    fn name(&self) -> &'static str {
        "sensational-language"
    }

    fn evaluate(&self, content: &Content<'_>, rules: &RuleSet) -> Vec<RuleHit> {
        if !rules.is_enabled(RuleCategory::SensationalLanguage) {
            return Vec::new();
        }
        phrase_hits(
            &content.lowered,
            &rules.unreliable_phrases,
            RuleCategory::SensationalLanguage,
            SENSATIONAL_PENALTY,
            |phrase| format!("Contains sensationalist language: \"{}\"", phrase),
        )
    }
}

/// Rule for attribution phrases ("according to", "study shows", ...)
pub struct CredibleLanguageRule;

impl CredibleLanguageRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CredibleLanguageRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRule for CredibleLanguageRule {
    fn name(&self) -> &'static str {
        "credible-language"
    }

    fn evaluate(&self, content: &Content<'_>, rules: &RuleSet) -> Vec<RuleHit> {
        if !rules.is_enabled(RuleCategory::CredibleLanguage) {
            return Vec::new();
        }
        phrase_hits(
            &content.lowered,
            &rules.reliable_phrases,
            RuleCategory::CredibleLanguage,
            CREDIBLE_BONUS,
            |phrase| format!("Contains credible language: \"{}\"", phrase),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensational(text: &str) -> Vec<RuleHit> {
        SensationalLanguageRule::new().evaluate(&Content::new(text), &RuleSet::default())
    }

    fn credible(text: &str) -> Vec<RuleHit> {
        CredibleLanguageRule::new().evaluate(&Content::new(text), &RuleSet::default())
    }

    #[test]
    fn detects_sensational_phrases_in_table_order() {
        let hits = sensational("EXPOSED: the Secret they hid");
        let messages: Vec<&str> = hits.iter().map(|h| h.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Contains sensationalist language: \"secret\"",
                "Contains sensationalist language: \"exposed\"",
            ]
        );
        assert!(hits.iter().all(|h| h.delta == -8));
    }

    #[test]
    fn matches_inside_longer_words() {
        // Substring test, not word boundaries: "secretary" contains "secret".
        assert_eq!(sensational("The secretary resigned.").len(), 1);
    }

    #[test]
    fn apostrophe_phrase_is_matched() {
        let hits = sensational("You Won't Believe this");
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].message,
            "Contains sensationalist language: \"you won't believe\""
        );
    }

    #[test]
    fn detects_credible_phrases() {
        let hits = credible("A study shows the effect was confirmed by peers.");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].message, "Contains credible language: \"study shows\"");
        assert_eq!(hits[1].message, "Contains credible language: \"confirmed by\"");
        assert!(hits.iter().all(|h| h.delta == 5));
        assert!(hits.iter().all(|h| h.category == RuleCategory::CredibleLanguage));
    }

    #[test]
    fn disabled_category_yields_nothing() {
        let rules = RuleSet::default().without(RuleCategory::SensationalLanguage);
        let hits =
            SensationalLanguageRule::new().evaluate(&Content::new("shocking secret"), &rules);
        assert!(hits.is_empty());
    }
}
