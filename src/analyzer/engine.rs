//! Scoring engine - runs every rule in a fixed order

use crate::error::ScoringError;
use crate::{ScoringInput, ScoringResult, Verdict};

use super::rules::{
    Content, ContentRule, CredibleLanguageRule, EmotionalLanguageRule, ExcessiveCapsRule,
    ExcessivePunctuationRule, LinkSpamRule, SensationalLanguageRule, SourceDomainRule,
    TrustedSourceRule, UntrustedSourceRule,
};
use super::scoring::NEUTRAL_SCORE;
use super::{RuleSet, ScoreCalculator};

/// Main scoring engine.
///
/// Holds only immutable data, so one engine can be shared across threads.
pub struct ScoringEngine {
    rules: RuleSet,
    /// Text rules in evaluation order; this order fixes the order of
    /// `indicators` and `sources`
    content_rules: Vec<Box<dyn ContentRule>>,
    domain_rule: SourceDomainRule,
}

impl ScoringEngine {
    /// Create an engine with the built-in rule tables
    pub fn new() -> Self {
        Self::with_rules(RuleSet::default())
    }

    /// Create an engine with custom rule tables
    pub fn with_rules(rules: RuleSet) -> Self {
        Self {
            rules: rules.normalized(),
            content_rules: vec![
                Box::new(SensationalLanguageRule::new()),
                Box::new(CredibleLanguageRule::new()),
                Box::new(TrustedSourceRule::new()),
                Box::new(UntrustedSourceRule::new()),
                Box::new(ExcessiveCapsRule::new()),
                Box::new(ExcessivePunctuationRule::new()),
                Box::new(LinkSpamRule::new()),
                Box::new(EmotionalLanguageRule::new()),
            ],
            domain_rule: SourceDomainRule::new(),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Validate and score one input
    pub fn analyze(&self, input: &ScoringInput) -> Result<ScoringResult, ScoringError> {
        if input.text.trim().is_empty() {
            return Err(ScoringError::InvalidInput);
        }
        Ok(self.score(&input.text, input.source_url()))
    }

    /// Score text without validation. Never fails; empty text scores neutral.
    pub fn score(&self, text: &str, source_url: Option<&str>) -> ScoringResult {
        let source_url = source_url.unwrap_or("");
        let content = Content::new(text);

        let mut hits = Vec::new();
        for rule in &self.content_rules {
            let rule_hits = rule.evaluate(&content, &self.rules);
            for hit in &rule_hits {
                log::debug!("{}: {:+} {}", rule.name(), hit.delta, hit.message);
            }
            hits.extend(rule_hits);
        }

        let pre_source_score = ScoreCalculator::apply(NEUTRAL_SCORE as u8, &hits);
        let verdict = Verdict::from_score(pre_source_score);
        let analysis = ScoreCalculator::analysis_for(verdict);

        // Intentional ordering: the URL adjustment lands after the verdict is
        // fixed and the score is clamped a second time. The verdict is not
        // recomputed, so a trusted domain can lift the displayed score past
        // 70 while the verdict stays UNCERTAIN.
        let mut credibility_score = pre_source_score;
        if let Some(hit) = self.domain_rule.evaluate(source_url, &self.rules) {
            log::debug!("{}: {:+} {}", self.domain_rule.name(), hit.delta, hit.message);
            credibility_score = ScoreCalculator::apply(pre_source_score, std::slice::from_ref(&hit));
            hits.push(hit);
        }

        let (sources, indicators): (Vec<_>, Vec<_>) =
            hits.iter().partition(|hit| hit.category.is_source());

        log::debug!(
            "scored {} chars: {} ({}), {} hits",
            content.lowered.chars().count(),
            credibility_score,
            verdict,
            hits.len()
        );

        ScoringResult {
            credibility_score,
            verdict,
            analysis: analysis.to_string(),
            indicators: indicators.into_iter().map(|h| h.message.clone()).collect(),
            sources: sources.into_iter().map(|h| h.message.clone()).collect(),
            content_length: content.lowered.chars().count(),
            source_url: source_url.to_string(),
            pre_source_score,
            hits,
        }
    }

    /// Analyze several inputs sequentially
    pub fn analyze_many(&self, inputs: &[ScoringInput]) -> Vec<Result<ScoringResult, ScoringError>> {
        inputs.iter().map(|input| self.analyze(input)).collect()
    }

    /// Analyze several inputs in parallel using rayon; output order matches input
    pub fn analyze_parallel(
        &self,
        inputs: &[ScoringInput],
    ) -> Vec<Result<ScoringResult, ScoringError>> {
        use rayon::prelude::*;

        inputs.par_iter().map(|input| self.analyze(input)).collect()
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}
