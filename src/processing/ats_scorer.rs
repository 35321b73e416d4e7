//! ATS (Applicant Tracking System) scoring of a candidate against a job description

use crate::error::{Result, ScoringError};
use crate::processing::candidate::CandidateRecord;
use crate::processing::text_processor::TextProcessor;
use crate::processing::tfidf::{cosine_similarity, TfIdfVectorizer};
use crate::processing::vocabulary::{Vocabulary, JOB_EDUCATION};
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const KEYWORD_WEIGHT: f64 = 0.4;
pub const SKILLS_WEIGHT: f64 = 0.3;
pub const EXPERIENCE_WEIGHT: f64 = 0.2;
pub const EDUCATION_WEIGHT: f64 = 0.1;

/// Unweighted component scores, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub keyword: f64,
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

/// Weighted contributions of each component and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_score: f64,
    pub skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub total_score: f64,
    pub components: ComponentScores,
}

impl ScoreBreakdown {
    pub fn from_components(components: ComponentScores) -> Self {
        let keyword_score = components.keyword * KEYWORD_WEIGHT;
        let skills_score = components.skills * SKILLS_WEIGHT;
        let experience_score = components.experience * EXPERIENCE_WEIGHT;
        let education_score = components.education * EDUCATION_WEIGHT;

        Self {
            keyword_score,
            skills_score,
            experience_score,
            education_score,
            total_score: keyword_score + skills_score + experience_score + education_score,
            components,
        }
    }
}

pub struct ScoreCalculator {
    processor: TextProcessor,
    required_experience_patterns: Vec<Regex>,
    first_number: Regex,
    education_keywords: Vocabulary,
}

impl ScoreCalculator {
    pub fn new() -> Result<Self> {
        let required_experience_patterns = vec![
            Regex::new(r"([0-9]+)\s*(?:\+)?\s*(?:years?|yrs?)\s*(?:of\s*)?(?:experience|exp)")?,
            Regex::new(r"minimum\s*([0-9]+)\s*(?:years?|yrs?)")?,
            Regex::new(r"at least\s*([0-9]+)\s*(?:years?|yrs?)")?,
        ];

        Ok(Self {
            processor: TextProcessor::new(),
            required_experience_patterns,
            first_number: Regex::new(r"([0-9]+)")?,
            education_keywords: Vocabulary::new(JOB_EDUCATION)?,
        })
    }

    /// Score a candidate against a job description. Never fails.
    pub fn score(&self, record: &CandidateRecord, job_description: &str) -> ScoreBreakdown {
        let keyword = match self.keyword_score(&record.raw_text, job_description) {
            Ok(score) => score,
            Err(ScoringError::EmptyVocabulary) => {
                warn!("No scorable terms in resume or job description; keyword score is 0");
                0.0
            }
        };

        let components = ComponentScores {
            keyword,
            skills: self.skills_score(&record.skills, job_description),
            experience: self.experience_score(&record.experience_summary, job_description),
            education: self.education_score(&record.education, job_description),
        };

        debug!("Component scores: {:?}", components);

        ScoreBreakdown::from_components(components)
    }

    /// TF-IDF cosine similarity of the two texts as a percentage.
    pub fn keyword_score(&self, resume_text: &str, job_description: &str) -> std::result::Result<f64, ScoringError> {
        let resume_clean = self.processor.normalize(resume_text);
        let job_clean = self.processor.normalize(job_description);

        let matrix = TfIdfVectorizer::new(&self.processor)
            .fit_transform(&[resume_clean.as_str(), job_clean.as_str()])?;

        Ok(cosine_similarity(&matrix.rows[0], &matrix.rows[1]) * 100.0)
    }

    pub fn skills_score(&self, skills: &[String], job_description: &str) -> f64 {
        if skills.is_empty() {
            return 0.0;
        }

        let job_lower = job_description.to_lowercase();
        let matched = skills
            .iter()
            .filter(|skill| job_lower.contains(&skill.to_lowercase()))
            .count();

        matched as f64 / skills.len() as f64 * 100.0
    }

    pub fn experience_score(&self, experience_summary: &str, job_description: &str) -> f64 {
        let job_lower = job_description.to_lowercase();

        let required = self
            .required_experience_patterns
            .iter()
            .find_map(|pattern| pattern.captures(&job_lower))
            .and_then(|caps| caps.get(1))
            .map(|m| parse_years(m.as_str()))
            .unwrap_or(0);

        let candidate = self
            .first_number
            .find(experience_summary)
            .map(|m| parse_years(m.as_str()))
            .unwrap_or(0);

        debug!("Experience: candidate {} years, required {} years", candidate, required);

        experience_step(candidate, required)
    }

    pub fn education_score(&self, education: &[String], job_description: &str) -> f64 {
        if education.is_empty() {
            return 50.0;
        }

        let job_lower = job_description.to_lowercase();
        if !self.education_keywords.mentions_any(&job_lower) {
            return 80.0;
        }

        let education_str = education.join(" ").to_lowercase();
        let matches = self
            .education_keywords
            .keywords()
            .iter()
            .filter(|keyword| education_str.contains(*keyword) && job_lower.contains(*keyword))
            .count();

        (matches as f64 * 25.0 + 50.0).min(100.0)
    }
}

/// Only ASCII digit runs reach here; values too large for u64 saturate.
fn parse_years(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

fn experience_step(candidate: u64, required: u64) -> f64 {
    if required == 0 {
        return 80.0;
    }

    let candidate = candidate as f64;
    let required = required as f64;

    if candidate >= required {
        100.0
    } else if candidate >= required * 0.8 {
        80.0
    } else if candidate >= required * 0.6 {
        60.0
    } else {
        30.0
    }
}
