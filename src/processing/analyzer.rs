//! Analysis engine: extraction followed by scoring

use crate::error::Result;
use crate::processing::{CandidateRecord, FieldExtractor, LanguageModel, ScoreBreakdown, ScoreCalculator};
use log::info;

pub struct AnalysisEngine {
    extractor: FieldExtractor,
    calculator: ScoreCalculator,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub candidate: CandidateRecord,
    pub scores: ScoreBreakdown,
}

impl AnalysisEngine {
    pub fn new() -> Result<Self> {
        Ok(Self {
            extractor: FieldExtractor::new()?,
            calculator: ScoreCalculator::new()?,
        })
    }

    pub fn with_language_model(mut self, model: Box<dyn LanguageModel>) -> Self {
        self.extractor = self.extractor.with_language_model(model);
        self
    }

    pub fn analyze(&self, resume_text: &str, job_description: &str) -> Analysis {
        let candidate = self.extractor.extract(resume_text);
        let scores = self.calculator.score(&candidate, job_description);

        info!("Scored '{}' at {:.1}", candidate.name, scores.total_score);

        Analysis { candidate, scores }
    }

    pub fn extractor(&self) -> &FieldExtractor {
        &self.extractor
    }
}
