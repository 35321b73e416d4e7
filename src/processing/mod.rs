//! Candidate extraction and ATS scoring

pub mod analyzer;
pub mod ats_scorer;
pub mod candidate;
pub mod field_extractor;
pub mod text_processor;
pub mod tfidf;
pub mod vocabulary;

pub use analyzer::{Analysis, AnalysisEngine};
pub use ats_scorer::{ComponentScores, ScoreBreakdown, ScoreCalculator};
pub use candidate::CandidateRecord;
pub use field_extractor::{FieldExtractor, LanguageModel};
