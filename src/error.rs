//! Error handling for the ATS scorer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Document conversion error: {0}")]
    DocumentConversion(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, AtsError>;

/// Failures of the TF-IDF vectorization step.
///
/// Only the failure modes that degenerate input can actually produce live
/// here; the keyword component turns each of them into a score of zero.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("empty vocabulary; the documents contain only stop words or no words at all")]
    EmptyVocabulary,
}

impl From<aho_corasick::BuildError> for AtsError {
    fn from(err: aho_corasick::BuildError) -> Self {
        AtsError::Processing(format!("Failed to build keyword matcher: {}", err))
    }
}
