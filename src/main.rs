//! Resume ranker: score and shortlist resumes against job requirements

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_ranker::cli::{self, Cli, Commands, ConfigAction};
use resume_ranker::config::{Config, ExtractionConfig};
use resume_ranker::error::{Result, ResumeRankerError};
use resume_ranker::extraction::{Extractor, FieldExtractor};
use resume_ranker::input::InputManager;
use resume_ranker::output::formatter::{resolve_save_path, save_report_to_file, ReportGenerator};
use resume_ranker::output::RankingReport;
use resume_ranker::processing::interpreter::FieldInterpreter;
use resume_ranker::processing::ranking::display_name;
use resume_ranker::processing::{BatchRanker, RequirementProfile};
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Rank {
            paths,
            experience_months,
            skills,
            weights,
            projects,
            shortlist,
            profile,
            output,
            save,
            detailed,
            backend,
        } => {
            let profile = match profile {
                Some(path) => {
                    cli::validate_file_extension(&path, &["toml"])
                        .map_err(|e| ResumeRankerError::InvalidInput(format!("Profile file: {}", e)))?;
                    RequirementProfile::load(&path)?
                }
                None => {
                    let months = experience_months.ok_or_else(|| {
                        ResumeRankerError::InvalidInput("--experience-months is required".to_string())
                    })?;
                    let shortlist = shortlist.ok_or_else(|| {
                        ResumeRankerError::InvalidInput("--shortlist is required".to_string())
                    })?;
                    RequirementProfile::new(months, skills, weights, projects, shortlist)?
                }
            };

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeRankerError::InvalidInput)?,
                None => config.output.format,
            };
            let detailed = detailed || config.output.detailed;
            let extraction = extraction_config(&config, backend.as_deref())?;

            let documents = InputManager::new()
                .with_extensions(&config.processing.extensions)
                .collect(&paths)
                .await?;
            if documents.is_empty() {
                return Err(ResumeRankerError::InvalidInput("No resumes found".to_string()));
            }
            info!(
                "Ranking {} resumes with the {} backend",
                documents.len(),
                extraction.backend.as_str()
            );

            let extractor = Extractor::from_config(&extraction)?;
            let ranker = BatchRanker::new(extractor).with_concurrency(config.processing.concurrency);

            let progress = ProgressBar::new(documents.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            let outcome = ranker
                .rank_batch_with_progress(documents, &profile, |candidate| {
                    progress.set_message(candidate.display_name.clone());
                    progress.inc(1);
                })
                .await;
            progress.finish_and_clear();
            let outcome = outcome?;

            if outcome.failed_extractions() > 0 {
                warn!(
                    "{} of {} resumes could not be extracted",
                    outcome.failed_extractions(),
                    outcome.candidates.len()
                );
            }

            let report = RankingReport::from_outcome(outcome, &profile, extraction.backend.as_str());

            let generator = ReportGenerator::with_options(config.output.color_output, detailed, true, true);
            println!("{}", generator.generate_report(&report, &output_format)?);

            if let Some(save_path) = save {
                let save_path = resolve_save_path(&save_path, &output_format);
                let plain = ReportGenerator::with_options(false, detailed, true, true);
                save_report_to_file(&plain.generate_report(&report, &output_format)?, &save_path)?;
                info!("Report saved to {}", save_path.display());
            }
        }

        Commands::Inspect { path, raw, backend } => {
            let extraction = extraction_config(&config, backend.as_deref())?;
            let documents = InputManager::new()
                .with_extensions(&config.processing.extensions)
                .collect(&[path])
                .await?;

            let extractor = Extractor::from_config(&extraction)?;
            let interpreter = FieldInterpreter::new();

            for document in &documents {
                let records = extractor.extract(document).await?;
                let resume = interpreter.interpret(&records);

                println!("📄 {}", display_name(resume.name.as_deref(), &document.file_name));
                if raw {
                    println!("{}", serde_json::to_string_pretty(&records)?);
                }
                println!("{}", serde_json::to_string_pretty(&resume)?);
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    let mut shown = config.clone();
                    if !shown.extraction.api_key.is_empty() {
                        shown.extraction.api_key = "********".to_string();
                    }
                    let content = toml::to_string_pretty(&shown).map_err(|e| {
                        ResumeRankerError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("⚙️  Current Configuration ({})\n", path.display());
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}

/// The configured extraction settings, with the CLI backend override applied.
fn extraction_config(config: &Config, backend: Option<&str>) -> Result<ExtractionConfig> {
    let mut extraction = config.extraction.clone();
    if let Some(backend) = backend {
        extraction.backend = cli::parse_backend(backend).map_err(ResumeRankerError::InvalidInput)?;
    }
    Ok(extraction)
}
