//! Config schema and deserialization

use crate::analyzer::RuleSet;
use crate::RuleCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Rule toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleState {
    On,
    /// Disable the rule entirely
    Off,
}

/// Phrase tables for language rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unreliable: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliable: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional: Option<Vec<String>>,
}

/// Trusted and untrusted lists (outlet names or domains)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustLists {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub untrusted: Option<Vec<String>>,
}

/// Root config structure for .credencerc.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Minimum score threshold (exit 1 if below). Default: 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,

    /// Per-category toggles. Key is the category id in kebab-case.
    #[serde(default)]
    pub rules: HashMap<String, RuleState>,

    #[serde(default)]
    pub keywords: KeywordConfig,

    /// Outlet names and unverified attributions mentioned in text
    #[serde(default)]
    pub sources: TrustLists,

    /// Source URL domains
    #[serde(default)]
    pub domains: TrustLists,

    /// Glob patterns for files/directories to exclude from batch analysis
    #[serde(default)]
    pub ignore: Vec<String>,

    /// File name suffixes picked up by batch analysis (default: .txt, .md)
    #[serde(default)]
    pub patterns: Vec<String>,

    /// History file path (relative to the config's directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<String>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<u8>) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        self
    }

    /// Get the state for a category, or None if config doesn't mention it
    pub fn rule_state(&self, category: RuleCategory) -> Option<RuleState> {
        self.rules.get(category.id()).copied()
    }

    /// Category ids in `rules` that don't name a known category
    pub fn unknown_rules(&self) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .rules
            .keys()
            .filter(|key| RuleCategory::from_str(key).is_err())
            .map(|key| key.as_str())
            .collect();
        unknown.sort_unstable();
        unknown
    }

    /// Build the engine's rule tables; lists absent from config keep the
    /// built-in defaults.
    pub fn rule_set(&self) -> RuleSet {
        let defaults = RuleSet::default();
        let pick = |configured: &Option<Vec<String>>, fallback: Vec<String>| {
            configured.clone().unwrap_or(fallback)
        };

        let disabled = RuleCategory::ALL
            .iter()
            .copied()
            .filter(|c| self.rule_state(*c) == Some(RuleState::Off))
            .collect();

        RuleSet {
            unreliable_phrases: pick(&self.keywords.unreliable, defaults.unreliable_phrases),
            reliable_phrases: pick(&self.keywords.reliable, defaults.reliable_phrases),
            emotional_words: pick(&self.keywords.emotional, defaults.emotional_words),
            trusted_sources: pick(&self.sources.trusted, defaults.trusted_sources),
            untrusted_sources: pick(&self.sources.untrusted, defaults.untrusted_sources),
            trusted_domains: pick(&self.domains.trusted, defaults.trusted_domains),
            untrusted_domains: pick(&self.domains.untrusted, defaults.untrusted_domains),
            disabled,
        }
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.history.is_none() {
            self.history = base.history;
        }

        for (rule, state) in base.rules {
            self.rules.entry(rule).or_insert(state);
        }

        fill(&mut self.keywords.unreliable, base.keywords.unreliable);
        fill(&mut self.keywords.reliable, base.keywords.reliable);
        fill(&mut self.keywords.emotional, base.keywords.emotional);
        fill(&mut self.sources.trusted, base.sources.trusted);
        fill(&mut self.sources.untrusted, base.sources.untrusted);
        fill(&mut self.domains.trusted, base.domains.trusted);
        fill(&mut self.domains.untrusted, base.domains.untrusted);

        // Merge ignore patterns
        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.patterns.is_empty() {
            self.patterns = base.patterns;
        }
    }

    /// Get file suffixes for batch analysis
    pub fn get_patterns(&self) -> Vec<&str> {
        if self.patterns.is_empty() {
            vec![".txt", ".md"]
        } else {
            self.patterns.iter().map(|s| s.as_str()).collect()
        }
    }

    /// History path resolved against the directory holding the config
    pub fn history_path(&self, config_dir: &Path) -> Option<std::path::PathBuf> {
        let history = self.history.as_ref()?;
        let path = Path::new(history);
        Some(if path.is_absolute() {
            path.to_path_buf()
        } else {
            config_dir.join(path)
        })
    }
}

fn fill(target: &mut Option<Vec<String>>, base: Option<Vec<String>>) {
    if target.is_none() {
        *target = base;
    }
}
