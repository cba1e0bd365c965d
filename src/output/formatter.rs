//! Output formatters for ranking reports

use crate::config::OutputFormat;
use crate::error::{Result, ResumeRankerError};
use crate::output::report::RankingReport;
use crate::processing::analyzer::CandidateAnalysis;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for formatting ranking reports
pub trait OutputFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colored scores
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter; the plain form is exactly the ranked `[{name, score}]` list
pub struct JsonFormatter {
    pretty: bool,
    detailed: bool,
}

/// Markdown formatter for sharing shortlists
pub struct MarkdownFormatter {
    include_metadata: bool,
    detailed: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn format_timestamp(report: &RankingReport) -> String {
    chrono::DateTime::<chrono::Utc>::from(report.metadata.generated_at)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
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
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score(&self, score: f64) -> String {
        let color = if score > 0.0 {
            Color::Green
        } else if score < 0.0 {
            Color::Red
        } else {
            Color::Yellow
        };
        self.colorize(&format!("{:.1}", score), color)
    }

    fn format_candidate(&self, rank: usize, candidate: &CandidateAnalysis) -> String {
        let mut output = String::new();
        let score = &candidate.score;

        output.push_str(&format!(
            "{}. {} {}\n",
            rank,
            self.colorize(&candidate.display_name, Color::White),
            self.colorize(&format!("({})", candidate.file_name), Color::BrightBlack)
        ));
        output.push_str(&format!(
            "   Experience: {} months -> {} | Skills: {} | Projects: {} | Total: {}\n",
            candidate.resume.experience_months,
            self.format_score(score.experience_score),
            self.format_score(score.skill_score),
            self.format_score(score.project_score),
            self.format_score(score.final_score)
        ));

        for entry in &candidate.resume.experience_entries {
            output.push_str(&format!("   • {} ({} months)\n", entry.raw, entry.months));
        }
        if !score.matched_skills.is_empty() {
            output.push_str(&format!(
                "   Matched skills: {}\n",
                self.colorize(&score.matched_skills.join(", "), Color::Green)
            ));
        }
        if !score.matched_projects.is_empty() {
            output.push_str(&format!(
                "   Matched projects: {}\n",
                self.colorize(&score.matched_projects.join(", "), Color::Green)
            ));
        }
        if let Some(error) = &candidate.extraction_error {
            output.push_str(&format!(
                "   {} {}\n",
                self.colorize("Extraction failed:", Color::Red),
                error
            ));
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME RANKING", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            format_timestamp(report),
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!(
            "Resumes: {} | Required experience: {} months | Shortlist: {}\n",
            report.metadata.resumes_processed,
            report.profile.required_experience_months,
            report.profile.shortlist_size
        ));

        output.push_str(&self.format_header("Shortlist", 2));
        if report.shortlist.is_empty() {
            output.push_str("  (empty)\n");
        }
        for (i, result) in report.shortlist.iter().enumerate() {
            output.push_str(&format!(
                "{:>3}. {:<32} {}\n",
                i + 1,
                result.display_name,
                self.format_score(result.final_score)
            ));
        }

        if self.detailed {
            output.push_str(&self.format_header("Score Breakdown", 2));
            for (i, candidate) in report.candidates.iter().enumerate() {
                output.push_str(&self.format_candidate(i + 1, candidate));
            }
        }

        if report.metadata.failed_extractions > 0 {
            output.push_str(&format!(
                "\n{}\n",
                self.colorize(
                    &format!(
                        "{} resume(s) could not be extracted and were scored without fields",
                        report.metadata.failed_extractions
                    ),
                    Color::Yellow
                )
            ));
        }

        output.push_str(&format!(
            "\nGenerated by Resume Ranker v{} | Extraction: {}\n",
            report.metadata.ranker_version, report.metadata.extraction_backend
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool, detailed: bool) -> Self {
        Self { pretty, detailed }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let value = if self.detailed {
            serde_json::to_value(report)?
        } else {
            serde_json::to_value(&report.shortlist)?
        };

        if self.pretty {
            Ok(serde_json::to_string_pretty(&value)?)
        } else {
            Ok(serde_json::to_string(&value)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, detailed: bool) -> Self {
        Self { include_metadata, detailed }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Resume Ranking\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms | **Resumes:** {}\n\n",
                format_timestamp(report),
                report.metadata.processing_time_ms,
                report.metadata.resumes_processed
            ));
        }

        output.push_str("## Requirements\n\n");
        output.push_str(&format!(
            "- Experience: {} months\n",
            report.profile.required_experience_months
        ));
        for skill in &report.profile.required_skills {
            output.push_str(&format!("- Skill `{}` (weight {})\n", skill.name, skill.weight));
        }
        for project in &report.profile.required_projects {
            output.push_str(&format!("- Project `{}`\n", project));
        }
        output.push('\n');

        output.push_str("## Shortlist\n\n");
        output.push_str("| Rank | Name | Score |\n");
        output.push_str("|------|------|-------|\n");
        for (i, result) in report.shortlist.iter().enumerate() {
            output.push_str(&format!(
                "| {} | {} | {:.1} |\n",
                i + 1,
                result.display_name,
                result.final_score
            ));
        }
        output.push('\n');

        if self.detailed {
            output.push_str("## Candidates\n\n");
            output.push_str("| File | Name | Months | Experience | Skills | Projects | Total |\n");
            output.push_str("|------|------|--------|------------|--------|----------|-------|\n");
            for candidate in &report.candidates {
                let score = &candidate.score;
                output.push_str(&format!(
                    "| `{}` | {} | {} | {:.1} | {:.1} | {:.1} | {:.1} |\n",
                    candidate.file_name,
                    candidate.display_name,
                    candidate.resume.experience_months,
                    score.experience_score,
                    score.skill_score,
                    score.project_score,
                    score.final_score
                ));
            }
            output.push('\n');
        }

        if report.metadata.failed_extractions > 0 {
            output.push_str(&format!(
                "> {} resume(s) could not be extracted.\n",
                report.metadata.failed_extractions
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json, detailed),
            markdown_formatter: MarkdownFormatter::new(include_metadata, detailed),
        }
    }

    pub fn generate_report(&self, report: &RankingReport, format: &OutputFormat) -> Result<String> {
        let formatters: [&dyn OutputFormatter; 3] = [
            &self.console_formatter,
            &self.json_formatter,
            &self.markdown_formatter,
        ];

        formatters
            .iter()
            .find(|formatter| formatter.supports_format() == *format)
            .ok_or_else(|| ResumeRankerError::OutputFormatting(format!("No formatter for {:?}", format)))?
            .format_report(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// Utility functions for saving reports
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// `path` itself, or a timestamped report name inside it when `path` is a directory.
pub fn resolve_save_path(path: &Path, format: &OutputFormat) -> PathBuf {
    if path.is_dir() {
        path.join(suggest_filename(format, true))
    } else {
        path.to_path_buf()
    }
}

pub fn suggest_filename(format: &OutputFormat, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("resume_ranking{}.txt", timestamp_suffix),
        OutputFormat::Json => format!("resume_ranking{}.json", timestamp_suffix),
        OutputFormat::Markdown => format!("resume_ranking{}.md", timestamp_suffix),
    }
}
