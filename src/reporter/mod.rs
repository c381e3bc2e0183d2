//! Reporter module for output formatting

pub mod console;
pub mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

use crate::ScoringResult;
use serde::Serialize;

/// A result together with what was scored (file path or "input")
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledResult {
    pub label: String,
    #[serde(flatten)]
    pub result: ScoringResult,
}

impl LabeledResult {
    pub fn new(label: impl Into<String>, result: ScoringResult) -> Self {
        Self {
            label: label.into(),
            result,
        }
    }
}
