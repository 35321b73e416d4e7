//! Fixed keyword vocabularies and substring matching over them

use crate::error::Result;
use aho_corasick::AhoCorasick;

/// Skills recognised in resumes, in reporting order.
pub const SKILLS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "react",
    "angular",
    "node.js",
    "sql",
    "mongodb",
    "aws",
    "azure",
    "docker",
    "kubernetes",
    "machine learning",
    "data science",
    "artificial intelligence",
    "project management",
    "agile",
    "scrum",
    "git",
    "html",
    "css",
];

/// Education keywords looked for in resumes.
pub const RESUME_EDUCATION: &[&str] = &[
    "bachelor",
    "master",
    "phd",
    "degree",
    "university",
    "college",
    "institute",
    "b.tech",
    "m.tech",
    "mba",
];

/// Education keywords looked for in job descriptions. Differs from
/// `RESUME_EDUCATION`: "engineering" instead of "institute".
pub const JOB_EDUCATION: &[&str] = &[
    "bachelor",
    "master",
    "phd",
    "degree",
    "university",
    "college",
    "b.tech",
    "m.tech",
    "mba",
    "engineering",
];

/// A keyword list answering "which entries occur anywhere in this text".
pub struct Vocabulary {
    keywords: Vec<&'static str>,
    matcher: AhoCorasick,
}

impl Vocabulary {
    pub fn new(keywords: &[&'static str]) -> Result<Self> {
        let matcher = AhoCorasick::new(keywords)?;
        Ok(Self {
            keywords: keywords.to_vec(),
            matcher,
        })
    }

    /// Entries contained in `text` (case-insensitive), in vocabulary order.
    pub fn find_in(&self, text: &str) -> Vec<&'static str> {
        let lowered = text.to_lowercase();
        let mut present = vec![false; self.keywords.len()];

        // Overlapping search so "java" is still reported inside "javascript".
        for mat in self.matcher.find_overlapping_iter(&lowered) {
            present[mat.pattern().as_usize()] = true;
        }

        self.keywords
            .iter()
            .zip(present)
            .filter_map(|(keyword, found)| found.then_some(*keyword))
            .collect()
    }

    pub fn mentions_any(&self, text: &str) -> bool {
        self.matcher.is_match(&text.to_lowercase())
    }

    pub fn keywords(&self) -> &[&'static str] {
        &self.keywords
    }
}
