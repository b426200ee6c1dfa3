//! Input manager: loads CV uploads, extracts them as a batch, and reads job
//! description files

use crate::error::{CareerCompassError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    extract_pdf_text, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use crate::processing::document::{Document, ReferenceDescription};
use indicatif::ProgressBar;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

/// Raw uploaded file: a name and its bytes
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// A document left out of the ranking run, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub document_id: String,
    pub reason: String,
}

/// Uploads read from disk, plus the paths that could not be read
#[derive(Debug, Clone, Default)]
pub struct UploadBatch {
    pub uploads: Vec<Upload>,
    pub failures: Vec<ExtractionFailure>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchExtraction {
    pub documents: Vec<Document>,
    pub failures: Vec<ExtractionFailure>,
}

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Read a CV file into an upload; only `.pdf` files are accepted
    pub async fn load_upload(&self, path: &Path) -> Result<Upload> {
        let file_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(FileType::from_extension);
        if file_type != Some(FileType::Pdf) {
            return Err(CareerCompassError::UnsupportedFormat(format!(
                "CVs must be PDF files: {}",
                path.display()
            )));
        }

        let bytes = fs::read(path).await.map_err(|e| {
            CareerCompassError::Extraction(format!("cannot read {}: {}", path.display(), e))
        })?;

        Ok(Upload {
            filename: upload_name(path),
            bytes,
        })
    }

    /// Read CV files; a file that cannot be read is recorded and skipped
    pub async fn load_uploads<P: AsRef<Path>>(&self, paths: &[P]) -> Result<UploadBatch> {
        let mut batch = UploadBatch::default();

        for path in paths {
            let path = path.as_ref();
            match self.load_upload(path).await {
                Ok(upload) => batch.uploads.push(upload),
                Err(e) if e.is_per_document() => {
                    warn!("Skipping {}: {}", path.display(), e);
                    batch.failures.push(ExtractionFailure {
                        document_id: upload_name(path),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(batch)
    }

    pub fn extract_upload(&self, upload: &Upload) -> Result<Document> {
        let text = extract_pdf_text(&upload.bytes)?;
        Ok(Document::new(upload.filename.clone(), text))
    }

    /// Extract every upload; failed documents are recorded and skipped
    pub fn extract_batch(&self, uploads: &[Upload]) -> BatchExtraction {
        self.extract_batch_with_progress(uploads, None)
    }

    pub fn extract_batch_with_progress(
        &self,
        uploads: &[Upload],
        progress: Option<&ProgressBar>,
    ) -> BatchExtraction {
        let mut batch = BatchExtraction::default();

        for upload in uploads {
            if let Some(pb) = progress {
                pb.set_message(upload.filename.clone());
            }

            match self.extract_upload(upload) {
                Ok(document) => {
                    info!(
                        "Extracted {} words from {}",
                        document.metadata.word_count, upload.filename
                    );
                    batch.documents.push(document);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", upload.filename, e);
                    batch.failures.push(ExtractionFailure {
                        document_id: upload.filename.clone(),
                        reason: e.to_string(),
                    });
                }
            }

            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        batch
    }

    /// Text of a job description or CV file, routed by extension
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(CareerCompassError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match self.detect_file_type(path)? {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(CareerCompassError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Load job descriptions from files, each labelled by its file stem
    pub async fn load_references<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
    ) -> Result<Vec<ReferenceDescription>> {
        let mut references = Vec::with_capacity(paths.len());

        for path in paths {
            let path = path.as_ref();
            let text = self.extract_text(path).await?;
            if text.trim().is_empty() {
                warn!("Job description {} is empty", path.display());
            }

            let label = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_else(|| format!("job-{}", references.len() + 1));

            references.push(ReferenceDescription::new(label, text.trim()));
        }

        Ok(references)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                CareerCompassError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
