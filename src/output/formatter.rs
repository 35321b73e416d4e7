//! Output formatters for analysis reports and stored-resume listings

use crate::config::OutputFormat;
use crate::error::{AtsError, Result};
use crate::output::report::{AnalysisReport, ScoreRating};
use crate::processing::ats_scorer::{EDUCATION_WEIGHT, EXPERIENCE_WEIGHT, KEYWORD_WEIGHT, SKILLS_WEIGHT};
use crate::storage::{Analytics, StoredResume};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
}

/// Console formatter with optional colors
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

/// Picks the formatter for a requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>ATS Analysis: {{ name }}</title>
    {% if include_styles %}
    <style>
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; max-width: 820px; margin: 0 auto; padding: 20px; color: #333; }
        h1 { border-bottom: 3px solid #007acc; padding-bottom: 10px; }
        .badge { padding: 6px 14px; border-radius: 16px; color: white; font-weight: bold; }
        .score-excellent { background: #28a745; }
        .score-good { background: #17a2b8; }
        .score-fair { background: #ffc107; color: #000; }
        .score-poor { background: #dc3545; }
        table { border-collapse: collapse; width: 100%; }
        td, th { border-bottom: 1px solid #e9ecef; padding: 8px; text-align: left; }
    </style>
    {% endif %}
</head>
<body>
    <h1>ATS Analysis <span class="badge {{ score_class }}">{{ total_score }}% {{ rating }}</span></h1>
    <h2>Candidate</h2>
    <table>
        <tr><th>Name</th><td>{{ name }}</td></tr>
        <tr><th>Email</th><td>{{ email }}</td></tr>
        <tr><th>Phone</th><td>{{ phone }}</td></tr>
        <tr><th>Experience</th><td>{{ experience }}</td></tr>
        <tr><th>Education</th><td>{{ education }}</td></tr>
    </table>
    <h2>Skills</h2>
    {% if skills.is_empty() %}
    <p>No recognised skills.</p>
    {% else %}
    <ul>
    {% for skill in skills %}
        <li>{{ skill }}</li>
    {% endfor %}
    </ul>
    {% endif %}
    <h2>Score Breakdown</h2>
    <table>
        <tr><th>Component</th><th>Score</th><th>Weight</th><th>Contribution</th></tr>
    {% for row in rows %}
        <tr><td>{{ row.label }}</td><td>{{ row.score }}</td><td>{{ row.weight }}</td><td>{{ row.contribution }}</td></tr>
    {% endfor %}
    </table>
    <p><small>Resume: {{ resume_file }} | Job: {{ job_source }} | Generated {{ generated_at }} by ats-scorer v{{ version }}</small></p>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    include_styles: bool,
    score_class: &'static str,
    total_score: String,
    rating: &'static str,
    name: String,
    email: String,
    phone: String,
    experience: String,
    education: String,
    skills: Vec<String>,
    rows: Vec<HtmlRow>,
    resume_file: String,
    job_source: String,
    generated_at: String,
    version: String,
}

struct HtmlRow {
    label: &'static str,
    score: String,
    weight: String,
    contribution: String,
}

/// (label, raw score, weight, weighted contribution) per component
fn breakdown_rows(report: &AnalysisReport) -> Vec<(&'static str, f64, f64, f64)> {
    let s = &report.scores;
    vec![
        ("Keyword match", s.components.keyword, KEYWORD_WEIGHT, s.keyword_score),
        ("Skills match", s.components.skills, SKILLS_WEIGHT, s.skills_score),
        ("Experience", s.components.experience, EXPERIENCE_WEIGHT, s.experience_score),
        ("Education", s.components.education, EDUCATION_WEIGHT, s.education_score),
    ]
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
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
            _ => ("░", Color::White),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, rating: ScoreRating) -> String {
        let color = match rating {
            ScoreRating::Excellent => Color::Green,
            ScoreRating::VeryGood => Color::BrightGreen,
            ScoreRating::Good => Color::Yellow,
            ScoreRating::Fair => Color::BrightYellow,
            ScoreRating::BelowAverage => Color::Red,
            ScoreRating::Poor => Color::BrightRed,
        };

        if self.use_colors {
            format!("[{}]", rating.label().color(color).bold())
        } else {
            format!("[{}]", rating.label())
        }
    }

    fn bar(score: f64, width: usize) -> String {
        let filled = ((score.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
        format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let candidate = &report.candidate;

        output.push_str(&self.format_header("ATS Resume Analysis", 1));
        output.push_str(&format!(
            "Total score: {} {}\n",
            self.colorize(&format!("{:.1}%", report.scores.total_score), Color::Cyan),
            self.format_score_badge(report.rating)
        ));

        output.push_str(&self.format_header("Candidate", 2));
        output.push_str(&format!("  Name:       {}\n", candidate.name));
        output.push_str(&format!("  Email:      {}\n", candidate.email));
        output.push_str(&format!("  Phone:      {}\n", candidate.phone));
        output.push_str(&format!("  Experience: {}\n", candidate.experience_summary));
        output.push_str(&format!("  Education:  {}\n", candidate.education.join(", ")));
        if candidate.skills.is_empty() {
            output.push_str("  Skills:     (none recognised)\n");
        } else {
            output.push_str(&format!("  Skills:     {}\n", candidate.skills.join(", ")));
        }

        output.push_str(&self.format_header("Score Breakdown", 2));
        for (label, raw, weight, weighted) in breakdown_rows(report) {
            output.push_str(&format!(
                "  {:<14} {} {:>5.1}  x{:.1} = {:>5.1}\n",
                label,
                self.colorize(&Self::bar(raw, 20), Color::Blue),
                raw,
                weight,
                weighted
            ));
        }

        if self.detailed {
            output.push_str(&self.format_header("Resume Text Preview", 3));
            let preview: String = candidate.raw_text.chars().take(400).collect();
            output.push_str(&preview);
            if candidate.raw_text.chars().count() > 400 {
                output.push_str("...");
            }
            output.push('\n');
        }

        output.push('\n');
        output.push_str(&format!(
            "Resume: {} | Job: {}",
            file_name(&report.metadata.resume_file),
            report.metadata.job_source
        ));
        if let Some(id) = report.metadata.stored_id {
            output.push_str(&format!(" | Stored as #{}", id));
        }
        output.push('\n');

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let candidate = &report.candidate;
        let mut output = String::new();

        output.push_str("# ATS Resume Analysis\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Resume:** `{}` | **Job:** `{}`\n\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                file_name(&report.metadata.resume_file),
                report.metadata.job_source
            ));
        }

        output.push_str(&format!(
            "**Total Score:** {:.1}% ({})\n\n",
            report.scores.total_score,
            report.rating.label()
        ));

        output.push_str("## Candidate\n\n");
        output.push_str(&format!("- **Name:** {}\n", candidate.name));
        output.push_str(&format!("- **Email:** {}\n", candidate.email));
        output.push_str(&format!("- **Phone:** {}\n", candidate.phone));
        output.push_str(&format!("- **Experience:** {}\n", candidate.experience_summary));
        output.push_str(&format!("- **Education:** {}\n", candidate.education.join(", ")));
        output.push_str(&format!("- **Skills:** {}\n\n", candidate.skills.join(", ")));

        output.push_str("## Score Breakdown\n\n");
        output.push_str("| Component | Score | Weight | Contribution |\n");
        output.push_str("|---|---:|---:|---:|\n");
        for (label, raw, weight, weighted) in breakdown_rows(report) {
            output.push_str(&format!("| {} | {:.1} | {:.1} | {:.1} |\n", label, raw, weight, weighted));
        }

        Ok(output)
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &AnalysisReport) -> HtmlTemplate {
        let score_class = match report.rating {
            ScoreRating::Excellent => "score-excellent",
            ScoreRating::VeryGood | ScoreRating::Good => "score-good",
            ScoreRating::Fair => "score-fair",
            ScoreRating::BelowAverage | ScoreRating::Poor => "score-poor",
        };

        let rows = breakdown_rows(report)
            .into_iter()
            .map(|(label, raw, weight, weighted)| HtmlRow {
                label,
                score: format!("{:.1}", raw),
                weight: format!("{:.1}", weight),
                contribution: format!("{:.1}", weighted),
            })
            .collect();

        let candidate = &report.candidate;
        HtmlTemplate {
            include_styles: self.include_styles,
            score_class,
            total_score: format!("{:.1}", report.scores.total_score),
            rating: report.rating.label(),
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            phone: candidate.phone.clone(),
            experience: candidate.experience_summary.clone(),
            education: candidate.education.join(", "),
            skills: candidate.skills.clone(),
            rows,
            resume_file: file_name(&report.metadata.resume_file),
            job_source: report.metadata.job_source.clone(),
            generated_at: report.metadata.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            version: report.metadata.version.clone(),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| AtsError::OutputFormatting(e.to_string()))
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

    pub fn generate_report(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
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

/// Table of stored resumes for `match` and `list`.
pub fn format_resume_table(resumes: &[StoredResume], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(resumes)?),
        OutputFormat::Markdown => {
            let mut output = String::from("| # | Name | Email | Phone | ATS Score | Experience | Date Added |\n");
            output.push_str("|---:|---|---|---|---:|---|---|\n");
            for r in resumes {
                output.push_str(&format!(
                    "| {} | {} | {} | {} | {:.1}% | {} | {} |\n",
                    r.id,
                    escape_cell(&r.name),
                    escape_cell(&r.email),
                    escape_cell(&r.phone),
                    r.total_score,
                    escape_cell(&r.experience),
                    r.created_at.format("%Y-%m-%d %H:%M")
                ));
            }
            Ok(output)
        }
        OutputFormat::Console | OutputFormat::Html => {
            let mut output = format!(
                "{:>4}  {:<28} {:<30} {:<18} {:>9}  {}\n",
                "#", "Name", "Email", "Phone", "ATS Score", "Date Added"
            );
            for r in resumes {
                output.push_str(&format!(
                    "{:>4}  {:<28} {:<30} {:<18} {:>8.1}%  {}\n",
                    r.id,
                    truncate(&r.name, 28),
                    truncate(&r.email, 30),
                    truncate(&r.phone, 18),
                    r.total_score,
                    r.created_at.format("%Y-%m-%d %H:%M")
                ));
            }
            Ok(output)
        }
    }
}

/// Count/average/max plus a histogram of total scores in 10-point buckets.
pub fn format_stats(analytics: &Analytics, scores: &[f64]) -> String {
    let mut output = String::new();
    output.push_str(&format!("Total resumes: {}\n", analytics.total_resumes));
    output.push_str(&format!("Average score: {:.1}%\n", analytics.avg_score));
    output.push_str(&format!("Top score:     {:.1}%\n", analytics.max_score));

    if scores.is_empty() {
        return output;
    }

    let buckets = score_histogram(scores);
    let tallest = buckets.iter().copied().max().unwrap_or(0).max(1);

    output.push_str("\nScore distribution\n");
    for (idx, count) in buckets.iter().enumerate() {
        let upper = if idx == 9 { 100 } else { idx * 10 + 9 };
        let width = (count * 40).div_ceil(tallest);
        output.push_str(&format!("  {:>3}-{:<3} | {} {}\n", idx * 10, upper, "#".repeat(width), count));
    }

    output
}

/// Ten buckets: [0,10), [10,20), ..., [90,100]. Out-of-range scores are clamped.
pub fn score_histogram(scores: &[f64]) -> [usize; 10] {
    let mut buckets = [0usize; 10];
    for score in scores {
        let idx = (score.clamp(0.0, 100.0) / 10.0).floor() as usize;
        buckets[idx.min(9)] += 1;
    }
    buckets
}

/// Pipes would otherwise split a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{CandidateRecord, ComponentScores, ScoreBreakdown};

    fn sample_report() -> AnalysisReport {
        let candidate = CandidateRecord {
            name: "Jane <Smith>".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-123-4567".to_string(),
            skills: vec!["python".to_string(), "docker".to_string()],
            experience_summary: "6 years".to_string(),
            education: vec!["bachelor".to_string()],
            raw_text: "Jane Smith".to_string(),
        };
        let scores = ScoreBreakdown::from_components(ComponentScores {
            keyword: 50.0,
            skills: 100.0,
            experience: 100.0,
            education: 75.0,
        });
        AnalysisReport::new(candidate, scores, "/tmp/resumes/jane.pdf", "job.txt")
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, false).format_report(&sample_report()).unwrap();

        assert!(output.contains("Total score: 77.5% [GOOD]"));
        assert!(output.contains("python, docker"));
        assert!(output.contains("Resume: jane.pdf | Job: job.txt"));
        assert!(!output.contains("Resume Text Preview"));
    }

    #[test]
    fn test_json_round_trips_scores() {
        let output = JsonFormatter::new(false).format_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["scores"]["total_score"], 77.5);
        assert_eq!(value["scores"]["keyword_score"], 20.0);
        assert_eq!(value["rating"], "Good");
    }

    #[test]
    fn test_markdown_table() {
        let output = MarkdownFormatter::new(false).format_report(&sample_report()).unwrap();

        assert!(output.contains("**Total Score:** 77.5% (GOOD)"));
        assert!(output.contains("| Education | 75.0 | 0.1 | 7.5 |"));
    }

    #[test]
    fn test_html_escapes_candidate_fields() {
        let output = HtmlFormatter::new(false).format_report(&sample_report()).unwrap();

        assert!(output.contains("Jane &#60;Smith&#62;"));
        assert!(!output.contains("<Smith>"));
        assert!(output.contains("<li>docker</li>"));
        assert!(!output.contains("<style>"));
    }

    #[test]
    fn test_markdown_resume_table_escapes_pipes() {
        let stored = StoredResume {
            id: 7,
            name: "Jane | Smith".to_string(),
            email: "jane|dev@example.com".to_string(),
            phone: "555|123".to_string(),
            skills: vec!["python".to_string()],
            experience: "6 years".to_string(),
            education: vec![],
            resume_text: String::new(),
            total_score: 81.0,
            keyword_score: 0.0,
            skills_score: 0.0,
            experience_score: 0.0,
            education_score: 0.0,
            created_at: chrono::Utc::now(),
        };

        let output = format_resume_table(&[stored], OutputFormat::Markdown).unwrap();
        let row = output.lines().nth(2).unwrap();

        assert!(row.starts_with("| 7 | Jane \\| Smith | jane\\|dev@example.com | 555\\|123 | 81.0%"));
        let unescaped_pipes = row.matches('|').count() - row.matches("\\|").count();
        assert_eq!(unescaped_pipes, 8);
    }

    #[test]
    fn test_histogram_buckets() {
        let buckets = score_histogram(&[0.0, 9.9, 10.0, 55.0, 99.0, 100.0]);
        assert_eq!(buckets, [2, 1, 0, 0, 0, 1, 0, 0, 0, 2]);
    }

    #[test]
    fn test_stats_on_empty_store() {
        let stats = Analytics {
            total_resumes: 0,
            avg_score: 0.0,
            max_score: 0.0,
        };
        let output = format_stats(&stats, &[]);

        assert!(output.contains("Total resumes: 0"));
        assert!(!output.contains("distribution"));
    }
}
