//! Analysis history - persist scored results to .credence-history.json
//!
//! Records are keyed by an analysis id and an owner id. The engine never
//! touches this module; callers decide what gets saved.

use crate::analyzer::{AggregateStats, ScoreCalculator};
use crate::error::{HistoryError, HistoryResult};
use crate::ScoringResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub const HISTORY_FILENAME: &str = ".credence-history.json";
/// Default page size for `list`
pub const DEFAULT_LIST_LIMIT: usize = 50;
const ID_LEN: usize = 24;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct HistoryFile {
    pub analyses: Vec<AnalysisRecord>,
}

/// One saved analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    pub owner_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    pub result: ScoringResult,
    pub created_at: DateTime<Utc>,
}

/// Per-owner statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total: usize,
    pub real_news: usize,
    pub fake_news: usize,
    pub uncertain: usize,
    pub average_score: f64,
}

impl From<AggregateStats> for HistoryStats {
    fn from(stats: AggregateStats) -> Self {
        Self {
            total: stats.total,
            real_news: stats.likely_real,
            fake_news: stats.likely_fake,
            uncertain: stats.uncertain,
            average_score: stats.average_score,
        }
    }
}

/// File-backed history store
pub struct HistoryStore {
    path: PathBuf,
    data: HistoryFile,
    /// The file on disk could not be parsed and has not been moved aside yet
    unreadable: bool,
}

impl HistoryStore {
    /// Open the store at `path`. A missing or corrupt file opens empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (data, unreadable) = match Self::load(&path) {
            Ok(data) => (data.unwrap_or_default(), false),
            Err(e) => {
                log::warn!("ignoring unreadable history {}: {}", path.display(), e);
                (HistoryFile::default(), true)
            }
        };
        Self {
            path,
            data,
            unreadable,
        }
    }

    /// Open `.credence-history.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::open(dir.join(HISTORY_FILENAME))
    }

    /// `Ok(None)` when there is no file yet
    fn load(path: &Path) -> HistoryResult<Option<HistoryFile>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unparseable history file is moved before the first write
    pub fn unreadable_backup_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| HISTORY_FILENAME.into());
        name.push(".corrupt");
        self.path.with_file_name(name)
    }

    /// Write `data` to disk, then make it the in-memory state.
    /// On error the in-memory state is left untouched.
    fn commit(&mut self, data: HistoryFile) -> HistoryResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        if self.unreadable && self.path.exists() {
            let backup = self.unreadable_backup_path();
            fs::rename(&self.path, &backup)?;
            log::warn!(
                "moved unreadable history {} to {}",
                self.path.display(),
                backup.display()
            );
        }
        self.unreadable = false;
        let content = serde_json::to_string_pretty(&data)?;
        fs::write(&self.path, content)?;
        self.data = data;
        Ok(())
    }

    /// Save a result for `owner`, stamped with the current time
    pub fn save(
        &mut self,
        owner: &str,
        title: Option<String>,
        text: &str,
        result: ScoringResult,
    ) -> HistoryResult<AnalysisRecord> {
        self.save_at(owner, title, text, result, Utc::now())
    }

    /// Save with an explicit timestamp
    pub fn save_at(
        &mut self,
        owner: &str,
        title: Option<String>,
        text: &str,
        result: ScoringResult,
        created_at: DateTime<Utc>,
    ) -> HistoryResult<AnalysisRecord> {
        let mut id = analysis_id(owner, &created_at, text, &result.source_url, 0);
        let mut salt = 1;
        while self.data.analyses.iter().any(|r| r.id == id) {
            id = analysis_id(owner, &created_at, text, &result.source_url, salt);
            salt += 1;
        }

        let record = AnalysisRecord {
            id,
            owner_id: owner.to_string(),
            title,
            text: text.to_string(),
            result,
            created_at,
        };
        let mut next = HistoryFile {
            analyses: self.data.analyses.clone(),
        };
        next.analyses.push(record.clone());
        self.commit(next)?;
        log::info!("saved analysis {} for {}", record.id, owner);
        Ok(record)
    }

    /// The owner's records, newest first
    pub fn list(&self, owner: &str, limit: usize) -> Vec<&AnalysisRecord> {
        let mut records: Vec<&AnalysisRecord> = self
            .data
            .analyses
            .iter()
            .filter(|r| r.owner_id == owner)
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        records
    }

    /// Look up one record, enforcing ownership
    pub fn get(&self, owner: &str, id: &str) -> HistoryResult<&AnalysisRecord> {
        let record = self
            .data
            .analyses
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| HistoryError::NotFound(id.to_string()))?;
        if record.owner_id != owner {
            return Err(HistoryError::Forbidden(id.to_string()));
        }
        Ok(record)
    }

    /// Delete one record, enforcing ownership
    pub fn delete(&mut self, owner: &str, id: &str) -> HistoryResult<AnalysisRecord> {
        self.get(owner, id)?;
        let index = self
            .data
            .analyses
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| HistoryError::NotFound(id.to_string()))?;
        let mut next = HistoryFile {
            analyses: self.data.analyses.clone(),
        };
        let removed = next.analyses.remove(index);
        self.commit(next)?;
        log::info!("deleted analysis {} for {}", id, owner);
        Ok(removed)
    }

    /// Verdict counts and average score over the owner's records
    pub fn stats(&self, owner: &str) -> HistoryStats {
        ScoreCalculator::aggregate(
            self.data
                .analyses
                .iter()
                .filter(|r| r.owner_id == owner)
                .map(|r| &r.result),
        )
        .into()
    }
}

/// Short hex id from SHA-256 over the record's identifying fields
fn analysis_id(
    owner: &str,
    created_at: &DateTime<Utc>,
    text: &str,
    source_url: &str,
    salt: u32,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(owner.as_bytes());
    hasher.update([0u8]);
    hasher.update(created_at.to_rfc3339().as_bytes());
    hasher.update([0u8]);
    hasher.update(text.as_bytes());
    hasher.update([0u8]);
    hasher.update(source_url.as_bytes());
    hasher.update(salt.to_le_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(ID_LEN);
    id
}
