//! Output formatters for ranking reports: console, JSON, Markdown and HTML

use crate::config::OutputFormat;
use crate::error::{CareerCompassError, Result};
use crate::output::report::{RankingReport, RankingResults};
use crate::processing::document::{display_name, RankedResult, ScoredMatch};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and match badges
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that dispatches to the formatter for each output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

/// Coarse strength of a similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrength {
    Strong,
    Moderate,
    Weak,
    None,
}

impl MatchStrength {
    pub fn from_score(score: f32) -> Self {
        if score >= 70.0 {
            MatchStrength::Strong
        } else if score >= 40.0 {
            MatchStrength::Moderate
        } else if score > 0.0 {
            MatchStrength::Weak
        } else {
            MatchStrength::None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStrength::Strong => "STRONG",
            MatchStrength::Moderate => "MODERATE",
            MatchStrength::Weak => "WEAK",
            MatchStrength::None => "NONE",
        }
    }

    fn color(&self) -> Color {
        match self {
            MatchStrength::Strong => Color::Green,
            MatchStrength::Moderate => Color::Yellow,
            MatchStrength::Weak => Color::BrightRed,
            MatchStrength::None => Color::BrightBlack,
        }
    }

    fn css_class(&self) -> &'static str {
        match self {
            MatchStrength::Strong => "score-strong",
            MatchStrength::Moderate => "score-moderate",
            MatchStrength::Weak => "score-weak",
            MatchStrength::None => "score-none",
        }
    }
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>CV Ranking Report</title>
    {% if include_styles %}
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            text-align: center;
            border-bottom: 3px solid #007acc;
            padding-bottom: 20px;
        }
        h2 { color: #007acc; border-bottom: 2px solid #e9ecef; padding-bottom: 10px; }
        table { width: 100%; border-collapse: collapse; margin: 15px 0; }
        th, td { text-align: left; padding: 8px; border-bottom: 1px solid #e9ecef; }
        .score-badge {
            display: inline-block;
            padding: 2px 10px;
            border-radius: 12px;
            font-weight: bold;
            font-size: 0.85em;
            color: white;
        }
        .score-strong { background: #28a745; }
        .score-moderate { background: #ffc107; color: #000; }
        .score-weak { background: #dc3545; }
        .score-none { background: #6c757d; }
        .failures { background: #fff3cd; padding: 15px; border-radius: 6px; }
        .metadata { color: #6c757d; font-size: 0.9em; margin-top: 30px; }
    </style>
    {% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>CV Ranking Report</h1>
            <p>Generated: {{ generated_at }} | Processing time: {{ processing_time }}ms</p>
        </div>

        {{ results_html | safe }}

        {% if has_failures %}
        <div class="section">
            <h2>Skipped Files</h2>
            <div class="failures">
                {{ failures_html | safe }}
            </div>
        </div>
        {% endif %}

        <div class="metadata">
            <p><strong>Generated by career-compass v{{ version }}</strong></p>
            <p><strong>Backend:</strong> {{ backend }} | <strong>Job descriptions:</strong> {{ reference_count }} | <strong>CVs ranked:</strong> {{ documents_ranked }}</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    generated_at: String,
    processing_time: u64,
    results_html: String,
    has_failures: bool,
    failures_html: String,
    version: String,
    backend: String,
    reference_count: usize,
    documents_ranked: usize,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_badge(&self, score: f32) -> String {
        let strength = MatchStrength::from_score(score);
        if self.use_colors {
            format!("[{}]", strength.label().color(strength.color()).bold())
        } else {
            format!("[{}]", strength.label())
        }
    }

    fn format_match(&self, position: usize, scored: &ScoredMatch) -> String {
        let mut line = format!(
            "Job {}: {} (Similarity: {:.2}%) {}\n",
            position,
            scored.reference_text,
            scored.score,
            self.format_badge(scored.score)
        );
        if self.detailed {
            line.push_str(&format!("    label: {}\n", self.colorize(&scored.label, Color::Cyan)));
        }
        line
    }

    fn format_document(&self, result: &RankedResult) -> String {
        let mut output = self.format_header(&format!("Top matches for {}", result.display_name()), 2);
        if result.matches.is_empty() {
            output.push_str(&self.colorize("No matches above the minimum score\n", Color::BrightBlack));
        }
        for (i, scored) in result.matches.iter().enumerate() {
            output.push_str(&self.format_match(i + 1, scored));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = self.format_header("📊 CV RANKING", 1);

        if self.detailed {
            output.push_str(&format!(
                "Generated: {} | Processing time: {}ms | Backend: {}\n",
                report.generated_at_utc(),
                report.metadata.processing_time_ms,
                report.metadata.backend
            ));
        }

        match &report.results {
            RankingResults::PerDocument(results) => {
                for result in results {
                    output.push_str(&self.format_document(result));
                }
            }
            RankingResults::Flattened(matches) => {
                output.push_str(&self.format_header("All matches", 2));
                for (i, scored) in matches.iter().enumerate() {
                    output.push_str(&format!(
                        "{:>3}. {} | {}",
                        i + 1,
                        self.colorize(display_name(&scored.document_id), Color::Cyan),
                        self.format_match(scored.reference_index + 1, scored)
                    ));
                }
            }
        }

        if report.results.is_empty() && report.failures.is_empty() {
            output.push_str("No CVs to rank.\n");
        }

        if !report.failures.is_empty() {
            output.push_str(&self.format_header("⚠️  Skipped files", 3));
            for failure in &report.failures {
                output.push_str(&format!(
                    "• {}: {}\n",
                    self.colorize(&failure.document_id, Color::Red),
                    failure.reason
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn table(rows: &[(usize, &ScoredMatch)], with_document: bool) -> String {
        let mut output = String::new();
        if with_document {
            output.push_str("| # | CV | Job | Similarity | Match |\n");
            output.push_str("|---|----|-----|------------|-------|\n");
        } else {
            output.push_str("| # | Job | Similarity | Match |\n");
            output.push_str("|---|-----|------------|-------|\n");
        }

        for (position, scored) in rows {
            let job = escape_markdown_cell(&scored.reference_text);
            let strength = MatchStrength::from_score(scored.score).label();
            if with_document {
                output.push_str(&format!(
                    "| {} | {} | {} | {:.2}% | {} |\n",
                    position,
                    escape_markdown_cell(display_name(&scored.document_id)),
                    job,
                    scored.score,
                    strength
                ));
            } else {
                output.push_str(&format!(
                    "| {} | {} | {:.2}% | {} |\n",
                    position, job, scored.score, strength
                ));
            }
        }
        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::from("# CV Ranking Report\n\n");

        match &report.results {
            RankingResults::PerDocument(results) => {
                for result in results {
                    output.push_str(&format!("## {}\n\n", result.display_name()));
                    let rows: Vec<_> = result.matches.iter().enumerate().map(|(i, m)| (i + 1, m)).collect();
                    output.push_str(&Self::table(&rows, false));
                    output.push('\n');
                }
            }
            RankingResults::Flattened(matches) => {
                output.push_str("## All matches\n\n");
                let rows: Vec<_> = matches.iter().enumerate().map(|(i, m)| (i + 1, m)).collect();
                output.push_str(&Self::table(&rows, true));
                output.push('\n');
            }
        }

        if !report.failures.is_empty() {
            output.push_str("## Skipped files\n\n");
            for failure in &report.failures {
                output.push_str(&format!("- **{}**: {}\n", failure.document_id, failure.reason));
            }
            output.push('\n');
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by career-compass v{} on {} using the {} backend ({}ms)*\n",
                report.metadata.version,
                report.generated_at_utc(),
                report.metadata.backend,
                report.metadata.processing_time_ms
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn match_rows(matches: &[ScoredMatch], with_document: bool) -> String {
        let mut html = String::from("<table>\n<tr><th>#</th>");
        if with_document {
            html.push_str("<th>CV</th>");
        }
        html.push_str("<th>Job</th><th>Similarity</th></tr>\n");

        for (i, scored) in matches.iter().enumerate() {
            let strength = MatchStrength::from_score(scored.score);
            html.push_str(&format!("<tr><td>{}</td>", i + 1));
            if with_document {
                html.push_str(&format!("<td>{}</td>", escape_html(display_name(&scored.document_id))));
            }
            html.push_str(&format!(
                "<td>{}</td><td>{:.2}% <span class=\"score-badge {}\">{}</span></td></tr>\n",
                escape_html(&scored.reference_text),
                scored.score,
                strength.css_class(),
                strength.label()
            ));
        }
        html.push_str("</table>\n");
        html
    }

    fn results_html(results: &RankingResults) -> String {
        match results {
            RankingResults::PerDocument(results) => results
                .iter()
                .map(|result| {
                    format!(
                        "<div class=\"section\">\n<h2>{}</h2>\n{}</div>\n",
                        escape_html(result.display_name()),
                        Self::match_rows(&result.matches, false)
                    )
                })
                .collect(),
            RankingResults::Flattened(matches) => format!(
                "<div class=\"section\">\n<h2>All matches</h2>\n{}</div>\n",
                Self::match_rows(matches, true)
            ),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let failures_html = report
            .failures
            .iter()
            .map(|f| format!("<p><strong>{}</strong>: {}</p>\n", escape_html(&f.document_id), escape_html(&f.reason)))
            .collect();

        let template = HtmlTemplate {
            include_styles: self.include_styles,
            generated_at: report.generated_at_utc(),
            processing_time: report.metadata.processing_time_ms,
            results_html: Self::results_html(&report.results),
            has_failures: !report.failures.is_empty(),
            failures_html,
            version: report.metadata.version.clone(),
            backend: report.metadata.backend.clone(),
            reference_count: report.metadata.reference_count,
            documents_ranked: report.metadata.documents_ranked,
        };

        template
            .render()
            .map_err(|e| CareerCompassError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
            html_formatter: HtmlFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &RankingReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };

    format!("cv_ranking{}.{}", timestamp_suffix, extension)
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn escape_markdown_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RankingMode;
    use crate::input::ExtractionFailure;
    use crate::output::report::ReportMetadata;
    use std::time::SystemTime;

    fn scored(document_id: &str, index: usize, text: &str, score: f32) -> ScoredMatch {
        ScoredMatch {
            document_id: document_id.to_string(),
            reference_index: index,
            label: format!("job-{}", index),
            reference_text: text.to_string(),
            score,
        }
    }

    fn sample_report(results: RankingResults) -> RankingReport {
        RankingReport {
            results,
            failures: vec![ExtractionFailure {
                document_id: "broken.pdf".to_string(),
                reason: "Extraction error: not a PDF".to_string(),
            }],
            metadata: ReportMetadata {
                generated_at: SystemTime::now(),
                processing_time_ms: 12,
                backend: "term-vector".to_string(),
                mode: RankingMode::PerDocument,
                reference_count: 2,
                documents_ranked: 1,
                version: "0.1.0".to_string(),
            },
        }
    }

    fn per_document_report() -> RankingReport {
        sample_report(RankingResults::PerDocument(vec![RankedResult {
            document_id: "alice.pdf".to_string(),
            matches: vec![
                scored("alice.pdf", 0, "Software engineer <Python>", 57.7351),
                scored("alice.pdf", 1, "Data analyst", 0.0),
            ],
        }]))
    }

    #[test]
    fn test_match_strength() {
        assert_eq!(MatchStrength::from_score(100.0), MatchStrength::Strong);
        assert_eq!(MatchStrength::from_score(40.0), MatchStrength::Moderate);
        assert_eq!(MatchStrength::from_score(0.5), MatchStrength::Weak);
        assert_eq!(MatchStrength::from_score(0.0), MatchStrength::None);
    }

    #[test]
    fn test_console_output() {
        let output = ConsoleFormatter::new(false, false)
            .format_report(&per_document_report())
            .unwrap();

        assert!(output.contains("Top matches for alice"));
        assert!(output.contains("Job 1: Software engineer <Python> (Similarity: 57.74%) [MODERATE]"));
        assert!(output.contains("Job 2: Data analyst (Similarity: 0.00%) [NONE]"));
        assert!(output.contains("broken.pdf"));
    }

    #[test]
    fn test_console_flattened_output() {
        let report = sample_report(RankingResults::Flattened(vec![
            scored("bob.pdf", 1, "Data analyst", 80.0),
            scored("alice.pdf", 0, "Software engineer", 20.0),
        ]));
        let output = ConsoleFormatter::new(false, false).format_report(&report).unwrap();

        let bob = output.find("bob").unwrap();
        let alice = output.find("alice").unwrap();
        assert!(bob < alice);
        assert!(output.contains("Job 2: Data analyst (Similarity: 80.00%) [STRONG]"));
    }

    #[test]
    fn test_json_output() {
        let output = JsonFormatter::new(true).format_report(&per_document_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["results"]["mode"], "per-document");
        assert_eq!(value["results"]["entries"][0]["document_id"], "alice.pdf");
        assert_eq!(value["failures"][0]["document_id"], "broken.pdf");
    }

    #[test]
    fn test_markdown_output() {
        let output = MarkdownFormatter::new(true).format_report(&per_document_report()).unwrap();

        assert!(output.contains("## alice"));
        assert!(output.contains("| 1 | Software engineer <Python> | 57.74% | MODERATE |"));
        assert!(output.contains("## Skipped files"));
    }

    #[test]
    fn test_html_output_is_escaped() {
        let output = HtmlFormatter::new(true).format_report(&per_document_report()).unwrap();

        assert!(output.contains("<h2>alice</h2>"));
        assert!(output.contains("Software engineer &lt;Python&gt;"));
        assert!(!output.contains("<Python>"));
        assert!(output.contains("Skipped Files"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(&OutputFormat::Json, false), "cv_ranking.json");
        assert!(suggest_filename(&OutputFormat::Html, true).ends_with(".html"));
    }

    #[test]
    fn test_save_report_to_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("out.md");

        save_report_to_file("# report", &path).unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "# report");
    }
}
