//! Field extraction from resume text

use crate::error::Result;
use crate::processing::candidate::{
    CandidateRecord, EDUCATION_NOT_SPECIFIED, EMAIL_NOT_FOUND, EXPERIENCE_NOT_SPECIFIED,
    NAME_NOT_FOUND, PHONE_NOT_FOUND,
};
use crate::processing::vocabulary::{Vocabulary, RESUME_EDUCATION, SKILLS};
use log::debug;
use regex::Regex;

/// Optional named-entity capability used for name detection.
pub trait LanguageModel: Send + Sync {
    /// The candidate's name, if the model recognises one.
    fn person_name(&self, text: &str) -> Option<String>;
}

pub struct FieldExtractor {
    language_model: Option<Box<dyn LanguageModel>>,
    email_regex: Regex,
    phone_regex: Regex,
    experience_patterns: Vec<Regex>,
    skills: Vocabulary,
    education: Vocabulary,
}

impl FieldExtractor {
    pub fn new() -> Result<Self> {
        let email_regex = Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")?;

        let phone_regex = Regex::new(r"(?:\+[0-9]{1,3}[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}")?;

        let experience_patterns = vec![
            Regex::new(r"([0-9]+)\s*(?:years?|yrs?)\s*(?:of\s*)?(?:experience|exp)")?,
            Regex::new(r"experience\s*:?\s*([0-9]+)\s*(?:years?|yrs?)")?,
        ];

        Ok(Self {
            language_model: None,
            email_regex,
            phone_regex,
            experience_patterns,
            skills: Vocabulary::new(SKILLS)?,
            education: Vocabulary::new(RESUME_EDUCATION)?,
        })
    }

    pub fn with_language_model(mut self, model: Box<dyn LanguageModel>) -> Self {
        self.language_model = Some(model);
        self
    }

    pub fn has_language_model(&self) -> bool {
        self.language_model.is_some()
    }

    /// Build a candidate record. Never fails; missing fields get sentinels.
    pub fn extract(&self, text: &str) -> CandidateRecord {
        let record = CandidateRecord {
            name: self.extract_name(text),
            email: self.extract_email(text),
            phone: self.extract_phone(text),
            skills: self.extract_skills(text),
            experience_summary: self.extract_experience(text),
            education: self.extract_education(text),
            raw_text: text.to_string(),
        };

        debug!(
            "Extracted candidate '{}' with {} skills, experience '{}'",
            record.name,
            record.skills.len(),
            record.experience_summary
        );

        record
    }

    pub fn extract_name(&self, text: &str) -> String {
        if let Some(model) = &self.language_model {
            if let Some(name) = model.person_name(text) {
                return name;
            }
            debug!("Language model found no name, using line heuristic");
        }

        text.split('\n')
            .take(3)
            .map(str::trim)
            .find(|line| line.split_whitespace().count() >= 2 && line.chars().count() < 50)
            .map(str::to_string)
            .unwrap_or_else(|| NAME_NOT_FOUND.to_string())
    }

    pub fn extract_email(&self, text: &str) -> String {
        self.email_regex
            .find(text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| EMAIL_NOT_FOUND.to_string())
    }

    pub fn extract_phone(&self, text: &str) -> String {
        self.phone_regex
            .find(text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| PHONE_NOT_FOUND.to_string())
    }

    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        self.skills
            .find_in(text)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn extract_experience(&self, text: &str) -> String {
        let lowered = text.to_lowercase();

        self.experience_patterns
            .iter()
            .find_map(|pattern| pattern.captures(&lowered))
            .and_then(|caps| caps.get(1))
            .map(|years| format!("{} years", years.as_str()))
            .unwrap_or_else(|| EXPERIENCE_NOT_SPECIFIED.to_string())
    }

    pub fn extract_education(&self, text: &str) -> Vec<String> {
        let found = self.education.find_in(text);

        if found.is_empty() {
            vec![EDUCATION_NOT_SPECIFIED.to_string()]
        } else {
            found.into_iter().map(str::to_string).collect()
        }
    }
}
