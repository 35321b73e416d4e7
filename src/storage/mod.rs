//! Persistence of analysed resumes

pub mod store;

pub use store::{Analytics, ResumeStore, StoredResume};
