//! Console reporter with colored output

use super::LabeledResult;
use crate::analyzer::AggregateStats;
use crate::Verdict;
use colored::{ColoredString, Colorize};
use std::fmt::Write;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single analysis result
    pub fn report(&self, labeled: &LabeledResult) {
        print!("{}", self.render(labeled));
    }

    /// Report multiple results with summary
    pub fn report_many(&self, results: &[LabeledResult], stats: &AggregateStats) {
        for labeled in results {
            self.report(labeled);
            println!("{}", "─".repeat(60));
        }
        print!("{}", self.render_summary(stats));
    }

    /// Report in quiet mode (just score)
    pub fn report_quiet(&self, labeled: &LabeledResult) {
        println!("{}", self.render_quiet(labeled));
    }

    /// `<label>: <score> (<VERDICT>)`
    pub fn render_quiet(&self, labeled: &LabeledResult) -> String {
        format!(
            "{}: {} ({})",
            labeled.label,
            labeled.result.credibility_score,
            self.colorize_verdict(labeled.result.verdict)
        )
    }

    pub fn render(&self, labeled: &LabeledResult) -> String {
        let result = &labeled.result;
        let mut out = String::new();

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            self.bold(&format!("Credibility Analysis: {}", labeled.label))
        );
        if result.source_url.is_empty() {
            let _ = writeln!(out, "   Length: {} chars", result.content_length);
        } else {
            let _ = writeln!(
                out,
                "   Length: {} chars | Source: {}",
                result.content_length, result.source_url
            );
        }
        let _ = writeln!(out);

        let _ = writeln!(
            out,
            "   Score: {} {}",
            self.create_score_bar(result.credibility_score, result.verdict),
            self.colorize_verdict(result.verdict)
        );
        let _ = writeln!(out, "   {}", self.dimmed(&result.analysis));
        let _ = writeln!(out);

        if !result.indicators.is_empty() {
            let _ = writeln!(out, "   {}", self.bold("Indicators:"));
            for indicator in &result.indicators {
                let _ = writeln!(out, "   {} {}", self.paint("⚠", Verdict::Uncertain), indicator);
            }
            let _ = writeln!(out);
        }

        if !result.sources.is_empty() {
            let _ = writeln!(out, "   {}", self.bold("Sources:"));
            for source in &result.sources {
                let _ = writeln!(out, "   {} {}", self.paint("→", Verdict::LikelyReal), source);
            }
            let _ = writeln!(out);
        }

        if self.verbose && !result.hits.is_empty() {
            let _ = writeln!(out, "   {}", self.bold("Rule hits:"));
            for hit in &result.hits {
                let _ = writeln!(
                    out,
                    "   {:>4} {}",
                    format!("{:+}", hit.delta),
                    self.dimmed(&format!("[{}]", hit.category))
                );
            }
            let _ = writeln!(
                out,
                "   {}",
                self.dimmed(&format!("pre-source score: {}", result.pre_source_score))
            );
            let _ = writeln!(out);
        }

        out
    }

    pub fn render_summary(&self, stats: &AggregateStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "{}", self.bold("Summary"));
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "   Analyzed:      {}", stats.total);
        let _ = writeln!(out, "   Average score: {:.1}", stats.average_score);
        let _ = writeln!(out, "   Likely real:   {}", stats.likely_real);
        let _ = writeln!(out, "   Uncertain:     {}", stats.uncertain);
        let _ = writeln!(out, "   Likely fake:   {}", stats.likely_fake);
        let _ = writeln!(out);
        out
    }

    fn colorize_verdict(&self, verdict: Verdict) -> String {
        self.paint(verdict.label(), verdict)
    }

    fn paint(&self, text: &str, verdict: Verdict) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        let colored: ColoredString = match verdict {
            Verdict::LikelyReal => text.green().bold(),
            Verdict::Uncertain => text.yellow(),
            Verdict::LikelyFake => text.red().bold(),
        };
        colored.to_string()
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.use_colors {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Coloured by the reported verdict, which can lag the final score.
    fn create_score_bar(&self, score: u8, verdict: Verdict) -> String {
        let filled = (score as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!("[{}{}] {:>3}", "█".repeat(filled), "░".repeat(empty), score);
        self.paint(&bar, verdict)
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{ScoreCalculator, ScoringEngine};

    fn labeled(text: &str, url: Option<&str>) -> LabeledResult {
        LabeledResult::new("article.txt", ScoringEngine::new().score(text, url))
    }

    #[test]
    fn quiet_line_has_label_score_and_verdict() {
        let reporter = ConsoleReporter::new().without_colors();
        let line = reporter.render_quiet(&labeled("plain words", None));
        assert_eq!(line, "article.txt: 50 (UNCERTAIN)");
    }

    #[test]
    fn render_lists_indicators_and_sources() {
        let reporter = ConsoleReporter::new().without_colors();
        let out = reporter.render(&labeled(
            "SHOCKING news, according to Reuters",
            Some("https://clickbait.com/x"),
        ));
        assert!(out.contains("Credibility Analysis: article.txt"));
        assert!(out.contains("Source: https://clickbait.com/x"));
        assert!(out.contains("Indicators:"));
        assert!(out.contains("Contains sensationalist language: \"shocking\""));
        assert!(out.contains("Sources:"));
        assert!(out.contains("Mentions trusted source: Reuters"));
        assert!(out.contains("Source from questionable domain: https://clickbait.com/x"));
        assert!(!out.contains("Rule hits:"));
    }

    #[test]
    fn verbose_render_shows_rule_hits() {
        let reporter = ConsoleReporter::new().without_colors().verbose();
        let out = reporter.render(&labeled("This is a secret.", None));
        assert!(out.contains("Rule hits:"));
        assert!(out.contains("-8 [sensational-language]"));
        assert!(out.contains("pre-source score: 42"));
    }

    #[test]
    fn score_bar_colour_follows_verdict() {
        colored::control::set_override(true);
        let item = labeled(
            "According to officials, data indicates a delay.",
            Some("https://www.npr.org/x"),
        );
        assert_eq!(item.result.credibility_score, 75);
        assert_eq!(item.result.verdict, Verdict::Uncertain);

        let out = ConsoleReporter::new().render(&item);
        let bar = format!("[{}{}] {:>3}", "█".repeat(15), "░".repeat(5), 75);
        assert!(out.contains(&bar.yellow().to_string()));
        assert!(!out.contains(&bar.green().bold().to_string()));
    }

    #[test]
    fn clean_text_omits_empty_sections() {
        let reporter = ConsoleReporter::new().without_colors();
        let out = reporter.render(&labeled("plain words", None));
        assert!(!out.contains("Indicators:"));
        assert!(!out.contains("Sources:"));
        assert!(!out.contains("Source:"));
    }

    #[test]
    fn summary_shows_counts_and_average() {
        let a = labeled("plain words", None);
        let b = labeled("This is a secret.", None);
        let stats = ScoreCalculator::aggregate([&a.result, &b.result]);
        let out = ConsoleReporter::new().without_colors().render_summary(&stats);
        assert!(out.contains("Analyzed:      2"));
        assert!(out.contains("Average score: 46.0"));
        assert!(out.contains("Uncertain:     1"));
        assert!(out.contains("Likely fake:   1"));
    }
}
