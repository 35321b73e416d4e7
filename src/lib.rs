//! ATS resume scorer library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;
pub mod storage;

pub use config::Config;
pub use error::{AtsError, Result, ScoringError};
pub use processing::{AnalysisEngine, CandidateRecord, ScoreBreakdown};
