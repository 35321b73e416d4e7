//! Text extraction from various file formats

use crate::error::{AtsError, Result};
use log::debug;
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::process::Command;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            AtsError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        Ok(text)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        self.markdown_to_text(&markdown_content)
    }
}

impl MarkdownExtractor {
    pub fn markdown_to_text(&self, markdown: &str) -> Result<String> {
        let parser = Parser::new(markdown);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        self.html_to_text(&html_output)
    }

    fn html_to_text(&self, html: &str) -> Result<String> {
        let text = html
            .replace("<br>", "\n")
            .replace("<br />", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n")
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'");

        let tags = Regex::new(r"<[^>]*>")?;
        // Unescape ampersands last so "&amp;lt;" stays literal text.
        let clean_text = tags.replace_all(&text, "").replace("&amp;", "&");

        let lines: Vec<&str> = clean_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        Ok(lines.join("\n"))
    }
}

/// Word documents are converted by an external `pandoc` binary.
pub struct DocxExtractor {
    program: String,
    timeout: Duration,
}

impl DocxExtractor {
    pub fn new(program: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            program: program.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        debug!("Converting {} with {}", path.display(), self.program);

        // A timed-out conversion must not outlive the dropped future.
        let mut cmd = Command::new(&self.program);
        cmd.kill_on_drop(true)
            .arg("-f")
            .arg("docx")
            .arg("-t")
            .arg("plain")
            .arg("--wrap=none")
            .arg(path);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                AtsError::DocumentConversion(format!(
                    "pandoc timed out after {}s on '{}'",
                    self.timeout.as_secs(),
                    path.display()
                ))
            })?
            .map_err(|e| {
                AtsError::DocumentConversion(format!("Failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AtsError::DocumentConversion(format!(
                "pandoc failed (exit {}): {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_formatting_is_stripped() {
        let text = MarkdownExtractor
            .markdown_to_text("# Jane Smith\n\n**Skills:** Rust & Python\n\n- Docker\n- AWS\n")
            .unwrap();

        assert!(text.starts_with("Jane Smith"));
        assert!(text.contains("Skills: Rust & Python"));
        assert!(text.contains("Docker"));
        assert!(!text.contains("**"));
        assert!(!text.contains('<'));
    }

    #[tokio::test]
    async fn test_plain_text_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Jane Smith\njane@example.com").unwrap();

        let text = PlainTextExtractor.extract(&path).await.unwrap();
        assert_eq!(text, "Jane Smith\njane@example.com");
    }

    #[tokio::test]
    async fn test_invalid_pdf_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not really a pdf").unwrap();

        let err = PdfExtractor.extract(&path).await.unwrap_err();
        assert!(matches!(err, AtsError::PdfExtraction(_)));
    }

    #[tokio::test]
    async fn test_missing_converter_is_conversion_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        std::fs::write(&path, b"PK").unwrap();

        let extractor = DocxExtractor::new(dir.path().join("no-such-pandoc").to_string_lossy(), 5);
        let err = extractor.extract(&path).await.unwrap_err();
        assert!(matches!(err, AtsError::DocumentConversion(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timed_out_conversion_is_killed() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let script = dir.path().join("slow-pandoc");
        std::fs::write(
            &script,
            format!("#!/bin/sh\nsleep 3\ntouch '{}'\n", marker.display()),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let path = dir.path().join("resume.docx");
        std::fs::write(&path, b"PK").unwrap();

        let extractor = DocxExtractor::new(script.to_string_lossy(), 1);
        let err = extractor.extract(&path).await.unwrap_err();
        assert!(matches!(err, AtsError::DocumentConversion(msg) if msg.contains("timed out")));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!marker.exists());
    }
}
