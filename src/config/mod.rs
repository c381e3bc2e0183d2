//! Configuration loading for Credence

mod schema;

pub use schema::{Config, KeywordConfig, RuleState, TrustLists};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".credencerc.json";

/// A config together with the file it came from (None for defaults)
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Directory relative paths in the config resolve against
    pub fn base_dir(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }
}

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<LoadedConfig> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => {
            let config = load_config_with_extends(&path, &mut HashSet::new())?;
            for unknown in config.unknown_rules() {
                log::warn!("{}: unknown rule category '{}'", path.display(), unknown);
            }
            log::debug!("loaded config from {}", path.display());
            Ok(LoadedConfig {
                config,
                path: Some(path),
            })
        }
        None => Ok(LoadedConfig::default()),
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    // Prevent circular extends
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if visited.contains(&canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }
    let config_dir = canonical.parent().map(Path::to_path_buf);
    visited.insert(canonical);

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    // "history" is relative to the file that names it, not to the child config.
    if let Some(dir) = config_dir {
        if let Some(history) = config.history_path(&dir) {
            config.history = Some(history.to_string_lossy().into_owned());
        }
    }

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference to a config
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));

    let extends_path = if Path::new(extends).is_absolute() {
        PathBuf::from(extends)
    } else {
        config_dir.join(extends)
    };

    // Ensure it has .json extension
    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .credencerc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Build a GlobSet from ignore patterns for path matching
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid ignore pattern: {}", pattern))?;
        builder.add(glob);
    }
    builder.build().map_err(|e| anyhow::anyhow!("{}", e))
}

/// Check if a path should be ignored based on config glob patterns
pub fn is_ignored(path: &Path, ignore_set: &GlobSet) -> bool {
    ignore_set.is_match(path)
}

/// Find the project root directory (containing .git or the config file)
pub fn find_project_root(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir;
    loop {
        if dir.join(".git").exists() || dir.join(CONFIG_FILENAME).exists() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Starter config listing every built-in table, so users can edit in place
pub fn starter_config(threshold: u8) -> Config {
    let rules = crate::analyzer::RuleSet::default();
    Config {
        threshold: Some(threshold),
        rules: crate::RuleCategory::ALL
            .iter()
            .map(|c| (c.id().to_string(), RuleState::On))
            .collect(),
        keywords: KeywordConfig {
            unreliable: Some(rules.unreliable_phrases),
            reliable: Some(rules.reliable_phrases),
            emotional: Some(rules.emotional_words),
        },
        sources: TrustLists {
            trusted: Some(rules.trusted_sources),
            untrusted: Some(rules.untrusted_sources),
        },
        domains: TrustLists {
            trusted: Some(rules.trusted_domains),
            untrusted: Some(rules.untrusted_domains),
        },
        ignore: vec!["**/drafts/**".to_string()],
        ..Config::default()
    }
}
