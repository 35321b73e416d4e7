//! Routes a document path to the extractor for its file type

use crate::config::InputConfig;
use crate::error::{AtsError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct InputManager {
    docx: DocxExtractor,
    /// `None` when caching is disabled
    cache: Option<HashMap<PathBuf, String>>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self::from_config(&crate::config::Config::default().input)
    }

    pub fn from_config(config: &InputConfig) -> Self {
        Self {
            docx: DocxExtractor::new(config.pandoc_path.clone(), config.pandoc_timeout_secs),
            cache: config.enable_cache.then(HashMap::new),
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.cache = enable.then(HashMap::new);
        self
    }

    /// Text of the document at `path`, served from the cache on repeat calls.
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if let Some(text) = self.cache.as_ref().and_then(|cache| cache.get(path)) {
            debug!("Cache hit for {}", path.display());
            return Ok(text.clone());
        }

        if !path.exists() {
            return Err(AtsError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let extension = path.extension().and_then(|ext| ext.to_str()).ok_or_else(|| {
            AtsError::InvalidInput(format!("File has no extension: {}", path.display()))
        })?;

        let file_type = FileType::from_extension(extension);
        info!("Reading {:?} document: {}", file_type, path.display());

        let text = match file_type {
            FileType::Pdf => PdfExtractor.extract(path).await?,
            FileType::Docx => self.docx.extract(path).await?,
            FileType::Text => PlainTextExtractor.extract(path).await?,
            FileType::Markdown => MarkdownExtractor.extract(path).await?,
            FileType::Unknown => {
                return Err(AtsError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if let Some(cache) = self.cache.as_mut() {
            cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    pub fn cache_size(&self) -> usize {
        self.cache.as_ref().map_or(0, HashMap::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_cache_rereads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.txt");
        std::fs::write(&path, "first").unwrap();

        let mut manager = InputManager::new().with_cache(false);
        assert_eq!(manager.extract_text(&path).await.unwrap(), "first");

        std::fs::write(&path, "second").unwrap();
        assert_eq!(manager.extract_text(&path).await.unwrap(), "second");
        assert_eq!(manager.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_missing_extension_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README");
        std::fs::write(&path, "no extension").unwrap();

        let err = InputManager::new().extract_text(&path).await.unwrap_err();
        assert!(matches!(err, AtsError::InvalidInput(_)));
    }
}
