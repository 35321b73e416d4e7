//! Report structures for a single resume analysis

use crate::processing::{CandidateRecord, ScoreBreakdown};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub candidate: CandidateRecord,
    pub scores: ScoreBreakdown,
    pub rating: ScoreRating,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub resume_file: String,
    /// File path of the job description, or "inline" for `--job-text`
    pub job_source: String,
    /// Store id when the analysis was persisted
    pub stored_id: Option<i64>,
    pub generated_at: DateTime<Utc>,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreRating {
    Excellent,
    VeryGood,
    Good,
    Fair,
    BelowAverage,
    Poor,
}

impl ScoreRating {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => ScoreRating::Excellent,
            s if s >= 80.0 => ScoreRating::VeryGood,
            s if s >= 70.0 => ScoreRating::Good,
            s if s >= 60.0 => ScoreRating::Fair,
            s if s >= 50.0 => ScoreRating::BelowAverage,
            _ => ScoreRating::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreRating::Excellent => "EXCELLENT",
            ScoreRating::VeryGood => "VERY GOOD",
            ScoreRating::Good => "GOOD",
            ScoreRating::Fair => "FAIR",
            ScoreRating::BelowAverage => "BELOW AVG",
            ScoreRating::Poor => "POOR",
        }
    }
}

impl AnalysisReport {
    pub fn new(
        candidate: CandidateRecord,
        scores: ScoreBreakdown,
        resume_file: impl Into<String>,
        job_source: impl Into<String>,
    ) -> Self {
        let rating = ScoreRating::from_score(scores.total_score);

        Self {
            candidate,
            scores,
            rating,
            metadata: ReportMetadata {
                resume_file: resume_file.into(),
                job_source: job_source.into(),
                stored_id: None,
                generated_at: Utc::now(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn with_stored_id(mut self, id: i64) -> Self {
        self.metadata.stored_id = Some(id);
        self
    }
}
