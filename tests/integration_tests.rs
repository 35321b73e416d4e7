//! Integration tests for the ATS scorer

use ats_scorer::input::InputManager;
use ats_scorer::output::{AnalysisReport, ReportGenerator};
use ats_scorer::config::OutputFormat;
use ats_scorer::processing::AnalysisEngine;
use ats_scorer::storage::ResumeStore;
use std::path::Path;

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.starts_with("John Doe"));
    assert!(text.contains("Node.js"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    let mut uncached = InputManager::new().with_cache(false);
    uncached.extract_text(path).await.unwrap();
    assert_eq!(uncached.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/unsupported.xyz");

    let result = manager.extract_text(path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_full_pipeline_scores_and_stores() {
    let mut manager = InputManager::new();
    let resume = manager.extract_text(Path::new("tests/fixtures/sample_resume.txt")).await.unwrap();
    let job = manager.extract_text(Path::new("tests/fixtures/sample_job.txt")).await.unwrap();

    let engine = AnalysisEngine::new().unwrap();
    let analysis = engine.analyze(&resume, &job);
    let candidate = &analysis.candidate;

    assert_eq!(candidate.name, "John Doe");
    assert_eq!(candidate.email, "john.doe@example.com");
    assert_eq!(candidate.phone, "(555) 987-6543");
    assert_eq!(
        candidate.skills,
        vec!["python", "java", "javascript", "react", "node.js", "sql", "aws", "docker", "agile", "git"]
    );
    assert_eq!(candidate.experience_summary, "6 years");
    assert_eq!(candidate.education, vec!["bachelor", "university"]);

    let c = analysis.scores.components;
    assert!((c.skills - 60.0).abs() < 1e-9);
    assert_eq!(c.experience, 100.0);
    assert_eq!(c.education, 75.0);
    assert!(c.keyword > 0.0 && c.keyword < 100.0);

    let expected = 0.4 * c.keyword + 18.0 + 20.0 + 7.5;
    assert!((analysis.scores.total_score - expected).abs() < 1e-9);

    let dir = tempfile::tempdir().unwrap();
    let store = ResumeStore::new(dir.path().join("resumes.db"));
    let stored = store.insert(candidate, &analysis.scores).await.unwrap();

    assert_eq!(stored.id, 1);
    assert_eq!(store.find_matches(0.0).await.unwrap().len(), 1);
    assert!(store.find_matches(100.0).await.unwrap().is_empty());

    let report = AnalysisReport::new(candidate.clone(), analysis.scores, "sample_resume.txt", "sample_job.txt")
        .with_stored_id(stored.id);
    let rendered = ReportGenerator::with_options(false, false)
        .generate_report(&report, OutputFormat::Console)
        .unwrap();
    assert!(rendered.contains("Stored as #1"));
}

#[tokio::test]
async fn test_markdown_and_text_resumes_extract_alike() {
    let mut manager = InputManager::new();
    let txt = manager.extract_text(Path::new("tests/fixtures/sample_resume.txt")).await.unwrap();
    let md = manager.extract_text(Path::new("tests/fixtures/sample_resume.md")).await.unwrap();

    let engine = AnalysisEngine::new().unwrap();
    let from_txt = engine.extractor().extract(&txt);
    let from_md = engine.extractor().extract(&md);

    assert_eq!(from_txt.name, from_md.name);
    assert_eq!(from_txt.email, from_md.email);
    assert_eq!(from_txt.skills, from_md.skills);
    assert_eq!(from_txt.education, from_md.education);
}
