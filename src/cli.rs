//! CLI interface for the resume ranker

use crate::config::{ExtractionBackend, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-ranker")]
#[command(about = "Rank resumes against a job requirement profile")]
#[command(long_about = "Extract structured fields from resumes, score experience, skills and projects against weighted requirements, and print a ranked shortlist")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank a batch of resumes and print the shortlist
    Rank {
        /// Resume files or directories of resumes
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Required experience in months
        #[arg(short = 'm', long, required_unless_present = "profile", allow_hyphen_values = true)]
        experience_months: Option<i64>,

        /// Required skill (repeat; paired with --weight by position)
        #[arg(long = "skill")]
        skills: Vec<String>,

        /// Weight of the skill at the same position
        #[arg(long = "weight", allow_hyphen_values = true)]
        weights: Vec<f64>,

        /// Required project (repeatable)
        #[arg(long = "project")]
        projects: Vec<String>,

        /// Number of resumes to keep
        #[arg(short = 'n', long, required_unless_present = "profile")]
        shortlist: Option<usize>,

        /// Requirement profile in TOML instead of the flags above
        #[arg(short, long, conflicts_with_all = ["experience_months", "skills", "weights", "projects", "shortlist"])]
        profile: Option<PathBuf>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to a file, or into a directory under a generated name
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include the per-resume score breakdown
        #[arg(short, long)]
        detailed: bool,

        /// Extraction backend: json, form-recognizer
        #[arg(short, long)]
        backend: Option<String>,
    },

    /// Show the fields interpreted from a single resume
    Inspect {
        /// Resume file
        path: PathBuf,

        /// Also print the raw extracted field tree
        #[arg(long)]
        raw: bool,

        /// Extraction backend: json, form-recognizer
        #[arg(short, long)]
        backend: Option<String>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

pub fn parse_backend(backend: &str) -> Result<ExtractionBackend, String> {
    match backend.to_lowercase().as_str() {
        "json" => Ok(ExtractionBackend::Json),
        "form-recognizer" | "formrecognizer" => Ok(ExtractionBackend::FormRecognizer),
        _ => Err(format!("Invalid extraction backend: {}. Supported: json, form-recognizer", backend)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
