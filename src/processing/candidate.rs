//! Structured candidate data extracted from a resume

use serde::{Deserialize, Serialize};

pub const NAME_NOT_FOUND: &str = "Name not found";
pub const EMAIL_NOT_FOUND: &str = "Email not found";
pub const PHONE_NOT_FOUND: &str = "Phone not found";
pub const EXPERIENCE_NOT_SPECIFIED: &str = "Experience not specified";
pub const EDUCATION_NOT_SPECIFIED: &str = "Education not specified";

/// Fields pulled out of one resume.
///
/// `skills` may be empty. `education` never is: when no keyword matches it
/// holds the single entry [`EDUCATION_NOT_SPECIFIED`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
    pub experience_summary: String,
    pub education: Vec<String>,
    pub raw_text: String,
}
