//! ats-scorer: resume field extraction and ATS scoring from the command line

use ats_scorer::cli::{self, Cli, Commands, ConfigAction};
use ats_scorer::config::{Config, OutputFormat};
use ats_scorer::error::{AtsError, Result};
use ats_scorer::input::InputManager;
use ats_scorer::output::formatter::{format_resume_table, format_stats, save_report_to_file};
use ats_scorer::output::{AnalysisReport, ReportGenerator};
use ats_scorer::processing::AnalysisEngine;
use ats_scorer::storage::ResumeStore;
use clap::Parser;
use indicatif::ProgressBar;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

const RESUME_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md", "markdown"];
const JOB_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            job_text,
            output,
            save,
            detailed,
            no_store,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            run_analyze(&config, resume, job, job_text, format, save, detailed, no_store).await
        }

        Commands::Match { min_score, output } => {
            let min_score = cli::validate_min_score(min_score.unwrap_or(config.matching.default_min_score))
                .map_err(AtsError::InvalidInput)?;
            let format = resolve_format(output.as_deref(), &config)?;

            let matches = ResumeStore::new(&config.storage.store_path).find_matches(min_score).await?;
            if matches.is_empty() {
                println!("No matching candidates found.");
            } else {
                print!("{}", format_resume_table(&matches, format)?);
            }
            Ok(())
        }

        Commands::List { output } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let resumes = ResumeStore::new(&config.storage.store_path).list_all().await?;

            if resumes.is_empty() {
                println!("No resumes in database.");
            } else {
                print!("{}", format_resume_table(&resumes, format)?);
            }
            Ok(())
        }

        Commands::Stats => {
            let store = ResumeStore::new(&config.storage.store_path);
            let analytics = store.analytics().await?;
            let scores = store.score_distribution().await?;
            print!("{}", format_stats(&analytics, &scores));
            Ok(())
        }

        Commands::Clear { yes } => {
            if !yes {
                return Err(AtsError::InvalidInput(
                    "Refusing to clear the store without --yes".to_string(),
                ));
            }
            let removed = ResumeStore::new(&config.storage.store_path).clear().await?;
            println!("Database cleared ({} resumes removed).", removed);
            Ok(())
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| AtsError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", content);
                Ok(())
            }
            ConfigAction::Reset => {
                Config::default().save_to(config_path)?;
                println!("Configuration reset: {}", config_path.display());
                Ok(())
            }
            ConfigAction::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
        },
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_analyze(
    config: &Config,
    resume: PathBuf,
    job: Option<PathBuf>,
    job_text: Option<String>,
    format: OutputFormat,
    save: Option<PathBuf>,
    detailed: bool,
    no_store: bool,
) -> Result<()> {
    cli::validate_file_extension(&resume, RESUME_EXTENSIONS)
        .map_err(|e| AtsError::InvalidInput(format!("Resume file: {}", e)))?;

    let mut input_manager = InputManager::from_config(&config.input);

    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Extracting text from {}", resume.display()));
    let resume_text = input_manager.extract_text(&resume).await;
    spinner.finish_and_clear();
    let resume_text = resume_text?;

    let (job_description, job_source) = match (job, job_text) {
        (Some(path), _) => {
            cli::validate_file_extension(&path, JOB_EXTENSIONS)
                .map_err(|e| AtsError::InvalidInput(format!("Job description file: {}", e)))?;
            let text = input_manager.extract_text(&path).await?;
            (text, path.to_string_lossy().to_string())
        }
        (None, Some(text)) => (text, "inline".to_string()),
        (None, None) => {
            return Err(AtsError::InvalidInput("A job description is required".to_string()));
        }
    };

    info!(
        "Resume: {} characters, job description: {} characters",
        resume_text.len(),
        job_description.len()
    );

    let engine = AnalysisEngine::new()?;
    let analysis = engine.analyze(&resume_text, &job_description);

    let mut report = AnalysisReport::new(
        analysis.candidate.clone(),
        analysis.scores,
        resume.to_string_lossy().to_string(),
        job_source,
    );

    if !no_store {
        let stored = ResumeStore::new(&config.storage.store_path)
            .insert(&analysis.candidate, &analysis.scores)
            .await?;
        report = report.with_stored_id(stored.id);
    }

    let generator = ReportGenerator::with_options(config.output.color_output, detailed || config.output.detailed);
    let rendered = generator.generate_report(&report, format)?;

    match save {
        Some(path) => {
            let plain = if format == OutputFormat::Console {
                ReportGenerator::with_options(false, detailed || config.output.detailed)
                    .generate_report(&report, format)?
            } else {
                rendered.clone()
            };
            save_report_to_file(&plain, &path)?;
            println!("{}", rendered);
            println!("Report saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn resolve_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(AtsError::InvalidInput),
        None => Ok(config.output.format),
    }
}
