//! CLI interface for the ATS scorer

use crate::config::OutputFormat;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ats-scorer")]
#[command(about = "Extract candidate details from resumes and score them against job descriptions")]
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
    /// Analyze a resume against a job description and store the result
    #[command(group(ArgGroup::new("job_input").required(true).args(["job", "job_text"])))]
    Analyze {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include a preview of the extracted resume text
        #[arg(short, long)]
        detailed: bool,

        /// Do not persist the analysis
        #[arg(long)]
        no_store: bool,
    },

    /// List stored candidates at or above a score threshold
    Match {
        /// Minimum total score (0-100)
        #[arg(short, long)]
        min_score: Option<f64>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List every stored candidate, newest first
    List {
        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show count, average and top score with a score histogram
    Stats,

    /// Remove every stored candidate
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
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

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
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

/// Reject thresholds outside the score range.
pub fn validate_min_score(score: f64) -> Result<f64, String> {
    if (0.0..=100.0).contains(&score) {
        Ok(score)
    } else {
        Err(format!("Minimum score must be between 0 and 100, got {}", score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_requires_a_job_source() {
        assert!(Cli::try_parse_from(["ats-scorer", "analyze", "-r", "cv.pdf"]).is_err());
        assert!(Cli::try_parse_from(["ats-scorer", "analyze", "-r", "cv.pdf", "--job-text", "Rust dev"]).is_ok());
        assert!(Cli::try_parse_from([
            "ats-scorer", "analyze", "-r", "cv.pdf", "-j", "job.txt", "--job-text", "Rust dev"
        ])
        .is_err());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(parse_output_format("MD"), Ok(OutputFormat::Markdown));
        assert_eq!(parse_output_format("json"), Ok(OutputFormat::Json));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_extension_validation() {
        let allowed = ["pdf", "docx", "txt", "md"];
        assert!(validate_file_extension(Path::new("cv.PDF"), &allowed).is_ok());
        assert!(validate_file_extension(Path::new("cv.odt"), &allowed).is_err());
        assert!(validate_file_extension(Path::new("cv"), &allowed).is_err());
    }

    #[test]
    fn test_min_score_range() {
        assert_eq!(validate_min_score(70.0), Ok(70.0));
        assert!(validate_min_score(-1.0).is_err());
        assert!(validate_min_score(100.5).is_err());
    }
}
