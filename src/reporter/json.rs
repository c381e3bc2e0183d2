//! JSON reporter for machine-readable output

use super::LabeledResult;
use crate::analyzer::AggregateStats;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        encoded.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single analysis result as JSON
    pub fn report(&self, labeled: &LabeledResult) -> String {
        self.encode(labeled, "{}")
    }

    /// Report multiple results as JSON array
    pub fn report_many(&self, results: &[LabeledResult]) -> String {
        self.encode(results, "[]")
    }

    /// Report with summary
    pub fn report_with_summary(&self, results: &[LabeledResult], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results,
            summary: JsonSummary {
                analyzed: stats.total,
                average_score: stats.average_score,
                likely_real: stats.likely_real,
                uncertain: stats.uncertain,
                likely_fake: stats.likely_fake,
            },
        };
        self.encode(&output, "{}")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [LabeledResult],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    analyzed: usize,
    average_score: f64,
    likely_real: usize,
    uncertain: usize,
    likely_fake: usize,
}
