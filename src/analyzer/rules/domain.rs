//! Source URL reputation.
//! Not a [`ContentRule`](super::ContentRule): it looks at the URL, not the
//! text, and the engine runs it only after the verdict is fixed.

use crate::analyzer::RuleSet;
use crate::{RuleCategory, RuleHit};

const TRUSTED_DOMAIN_BONUS: i32 = 15;
const UNTRUSTED_DOMAIN_PENALTY: i32 = -15;

/// Rule for the domain the content came from
pub struct SourceDomainRule;

impl SourceDomainRule {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &'static str {
        "source-domain"
    }

    /// At most one hit; a trusted match wins over an untrusted one.
    /// Any string is accepted: malformed URLs just match nothing.
    pub fn evaluate(&self, source_url: &str, rules: &RuleSet) -> Option<RuleHit> {
        if source_url.is_empty() {
            return None;
        }
        let url = source_url.to_lowercase();

        if rules.is_enabled(RuleCategory::TrustedDomain)
            && rules.trusted_domains.iter().any(|d| url.contains(d.as_str()))
        {
            return Some(RuleHit::new(
                RuleCategory::TrustedDomain,
                TRUSTED_DOMAIN_BONUS,
                format!("Source from trusted domain: {}", source_url),
            ));
        }

        if rules.is_enabled(RuleCategory::UntrustedDomain)
            && rules.untrusted_domains.iter().any(|d| url.contains(d.as_str()))
        {
            return Some(RuleHit::new(
                RuleCategory::UntrustedDomain,
                UNTRUSTED_DOMAIN_PENALTY,
                format!("Source from questionable domain: {}", source_url),
            ));
        }

        None
    }
}

impl Default for SourceDomainRule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(url: &str) -> Option<RuleHit> {
        SourceDomainRule::new().evaluate(url, &RuleSet::default())
    }

    #[test]
    fn trusted_domain_echoes_original_url() {
        let hit = eval("https://WWW.BBC.COM/News/1").unwrap();
        assert_eq!(hit.category, RuleCategory::TrustedDomain);
        assert_eq!(hit.delta, 15);
        assert_eq!(hit.message, "Source from trusted domain: https://WWW.BBC.COM/News/1");
    }

    #[test]
    fn untrusted_domain_penalized() {
        let hit = eval("http://fakenews.com/wow").unwrap();
        assert_eq!(hit.category, RuleCategory::UntrustedDomain);
        assert_eq!(hit.delta, -15);
        assert_eq!(hit.message, "Source from questionable domain: http://fakenews.com/wow");
    }

    #[test]
    fn trusted_wins_when_both_match() {
        let hit = eval("https://reuters.com/?ref=clickbait.com").unwrap();
        assert_eq!(hit.category, RuleCategory::TrustedDomain);
    }

    #[test]
    fn unknown_or_malformed_urls_match_nothing() {
        assert!(eval("https://example.org/post").is_none());
        assert!(eval("not a url at all").is_none());
        assert!(eval("").is_none());
    }

    #[test]
    fn disabled_trusted_falls_through_to_untrusted() {
        let rules = RuleSet::default().without(RuleCategory::TrustedDomain);
        let hit = SourceDomainRule::new()
            .evaluate("https://reuters.com/?ref=clickbait.com", &rules)
            .unwrap();
        assert_eq!(hit.category, RuleCategory::UntrustedDomain);
    }
}
