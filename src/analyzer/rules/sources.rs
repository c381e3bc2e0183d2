//! Named outlets and unverified attributions mentioned in the text

use super::{phrase_hits, Content, ContentRule};
use crate::analyzer::RuleSet;
use crate::{RuleCategory, RuleHit};

const TRUSTED_SOURCE_BONUS: i32 = 10;
const UNTRUSTED_SOURCE_PENALTY: i32 = -10;

/// Rule for mentions of established outlets
pub struct TrustedSourceRule;

impl TrustedSourceRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TrustedSourceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRule for TrustedSourceRule {
    fn name(&self) -> &'static str {
        "trusted-source-mention"
    }

    fn evaluate(&self, content: &Content<'_>, rules: &RuleSet) -> Vec<RuleHit> {
        if !rules.is_enabled(RuleCategory::TrustedSourceMention) {
            return Vec::new();
        }
        // The message carries the configured name, not the matched text.
        rules
            .trusted_sources
            .iter()
            .filter(|name| content.lowered.contains(&name.to_lowercase()))
            .map(|name| {
                RuleHit::new(
                    RuleCategory::TrustedSourceMention,
                    TRUSTED_SOURCE_BONUS,
                    format!("Mentions trusted source: {}", name),
                )
            })
            .collect()
    }
}

/// Rule for vague or unverifiable attributions
pub struct UntrustedSourceRule;

impl UntrustedSourceRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UntrustedSourceRule {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRule for UntrustedSourceRule {
    fn name(&self) -> &'static str {
        "untrusted-source-mention"
    }

    fn evaluate(&self, content: &Content<'_>, rules: &RuleSet) -> Vec<RuleHit> {
        if !rules.is_enabled(RuleCategory::UntrustedSourceMention) {
            return Vec::new();
        }
        phrase_hits(
            &content.lowered,
            &rules.untrusted_sources,
            RuleCategory::UntrustedSourceMention,
            UNTRUSTED_SOURCE_PENALTY,
            |phrase| format!("Relies on unverified source: {}", phrase),
        )
    }
}
