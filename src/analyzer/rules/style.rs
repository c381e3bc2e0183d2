//! Stylistic clickbait signals: shouting, punctuation runs, link stuffing,
//! and piled-up emotional words.

use super::{Content, ContentRule};
use crate::analyzer::RuleSet;
use crate::{RuleCategory, RuleHit};
use regex::Regex;
use std::sync::OnceLock;

const CAPS_PENALTY: i32 = -5;
const PUNCTUATION_PENALTY: i32 = -8;
const LINK_PENALTY: i32 = -5;
const EMOTIONAL_PENALTY: i32 = -6;

/// Rule fires when the count is strictly greater than the limit
const MAX_CAPS_WORDS: usize = 2;
const MAX_PUNCTUATION_RUNS: usize = 2;
const MAX_LINKS: usize = 3;
const MAX_EMOTIONAL_WORDS: usize = 1;

fn punctuation_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[!?]{2,}").expect("punctuation pattern is valid"))
}

fn link() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"https?://\S+").expect("link pattern is valid"))
}

/// Rule for all-caps shouting.
///
/// Runs on the original text: every other rule sees the lower-cased copy,
/// where no token could ever be upper case.
pub struct ExcessiveCapsRule;

impl ExcessiveCapsRule {
    pub fn new() -> Self {
        Self
    }

    /// Space-separated tokens longer than one character made only of
    /// upper-case letters
    pub fn count_caps_words(text: &str) -> usize {
        text.split(' ')
            .filter(|token| token.chars().count() > 1 && token.chars().all(char::is_uppercase))
            .count()
    }
}

impl Default for ExcessiveCapsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRule for ExcessiveCapsRule {
    fn name(&self) -> &'static str {
        "excessive-caps"
    }

    fn evaluate(&self, content: &Content<'_>, rules: &RuleSet) -> Vec<RuleHit> {
        if !rules.is_enabled(RuleCategory::ExcessiveCaps)
            || Self::count_caps_words(content.original) <= MAX_CAPS_WORDS
        {
            return Vec::new();
        }
        vec![RuleHit::new(
            RuleCategory::ExcessiveCaps,
            CAPS_PENALTY,
            "Contains excessive capitalization",
        )]
    }
}

/// Rule for runs like "!!!" or "?!?"
pub struct ExcessivePunctuationRule;

impl ExcessivePunctuationRule {
    pub fn new() -> Self {
        Self
    }

    pub fn count_runs(text: &str) -> usize {
        punctuation_run().find_iter(text).count()
    }
}

impl Default for ExcessivePunctuationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRule for ExcessivePunctuationRule {
    fn name(&self) -> &'static str {
        "excessive-punctuation"
    }

    fn evaluate(&self, content: &Content<'_>, rules: &RuleSet) -> Vec<RuleHit> {
        if !rules.is_enabled(RuleCategory::ExcessivePunctuation)
            || Self::count_runs(&content.lowered) <= MAX_PUNCTUATION_RUNS
        {
            return Vec::new();
        }
        vec![RuleHit::new(
            RuleCategory::ExcessivePunctuation,
            PUNCTUATION_PENALTY,
            "Contains excessive punctuation",
        )]
    }
}

/// Rule for link stuffing
pub struct LinkSpamRule;

impl LinkSpamRule {
    pub fn new() -> Self {
        Self
    }

    pub fn count_links(text: &str) -> usize {
        link().find_iter(text).count()
    }
}

impl Default for LinkSpamRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRule for LinkSpamRule {
    fn name(&self) -> &'static str {
        "link-spam"
    }

    fn evaluate(&self, content: &Content<'_>, rules: &RuleSet) -> Vec<RuleHit> {
        if !rules.is_enabled(RuleCategory::LinkSpam)
            || Self::count_links(&content.lowered) <= MAX_LINKS
        {
            return Vec::new();
        }
        vec![RuleHit::new(
            RuleCategory::LinkSpam,
            LINK_PENALTY,
            "Contains multiple links (common in clickbait)",
        )]
    }
}

/// Rule for several distinct emotional words in one text
pub struct EmotionalLanguageRule;

impl EmotionalLanguageRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EmotionalLanguageRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRule for EmotionalLanguageRule {
    fn name(&self) -> &'static str {
        "emotional-language"
    }

    fn evaluate(&self, content: &Content<'_>, rules: &RuleSet) -> Vec<RuleHit> {
        if !rules.is_enabled(RuleCategory::EmotionalLanguage) {
            return Vec::new();
        }
        // Presence, not frequency; the table is already de-duplicated.
        let present = rules
            .emotional_words
            .iter()
            .filter(|word| content.lowered.contains(word.as_str()))
            .count();
        if present <= MAX_EMOTIONAL_WORDS {
            return Vec::new();
        }
        vec![RuleHit::new(
            RuleCategory::EmotionalLanguage,
            EMOTIONAL_PENALTY,
            "Contains excessive emotional language",
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(rule: &dyn ContentRule, text: &str) -> Vec<RuleHit> {
        rule.evaluate(&Content::new(text), &RuleSet::default())
    }

    #[test]
    fn caps_count_ignores_single_letters_and_punctuated_tokens() {
        assert_eq!(ExcessiveCapsRule::count_caps_words("I AM SO MAD"), 3);
        assert_eq!(ExcessiveCapsRule::count_caps_words("A B C D"), 0);
        assert_eq!(ExcessiveCapsRule::count_caps_words("WOW!!! OMG!!"), 0);
        assert_eq!(ExcessiveCapsRule::count_caps_words("NASA and the FBI"), 2);
        assert_eq!(ExcessiveCapsRule::count_caps_words("no caps here"), 0);
    }

    #[test]
    fn caps_split_is_on_single_spaces() {
        // Tabs and newlines do not separate tokens.
        assert_eq!(ExcessiveCapsRule::count_caps_words("ONE\tTWO THREE"), 1);
        assert_eq!(ExcessiveCapsRule::count_caps_words("ONE  TWO  THREE"), 3);
    }

    #[test]
    fn caps_rule_needs_more_than_two_words() {
        assert!(eval(&ExcessiveCapsRule::new(), "BREAKING NEWS today").is_empty());
        let hits = eval(&ExcessiveCapsRule::new(), "BREAKING NEWS TODAY");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].message, "Contains excessive capitalization");
        assert_eq!(hits[0].delta, -5);
    }

    #[test]
    fn punctuation_runs_are_non_overlapping() {
        assert_eq!(ExcessivePunctuationRule::count_runs("what?!?! no!! yes!"), 2);
        assert_eq!(ExcessivePunctuationRule::count_runs("!!!!!!"), 1);
        assert!(eval(&ExcessivePunctuationRule::new(), "a!! b?? c").is_empty());
        let hits = eval(&ExcessivePunctuationRule::new(), "a!! b?? c?!");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].delta, -8);
    }

    #[test]
    fn link_spam_needs_more_than_three_links() {
        let three = "http://a.io https://b.io http://c.io";
        assert_eq!(LinkSpamRule::count_links(three), 3);
        assert!(eval(&LinkSpamRule::new(), three).is_empty());

        let four = format!("{} https://d.io/x?y=1", three);
        let hits = eval(&LinkSpamRule::new(), &four);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].message, "Contains multiple links (common in clickbait)");
    }

    #[test]
    fn bare_scheme_is_not_a_link() {
        assert_eq!(LinkSpamRule::count_links("http:// https:// ftp://x.io"), 0);
    }

    #[test]
    fn emotional_language_counts_distinct_words() {
        assert!(eval(&EmotionalLanguageRule::new(), "angry angry angry").is_empty());
        let hits = eval(&EmotionalLanguageRule::new(), "Angry and DEVASTATED");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].delta, -6);
        assert_eq!(hits[0].message, "Contains excessive emotional language");
    }
}
