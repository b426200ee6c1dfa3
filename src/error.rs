//! Error handling for the CV ranking pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareerCompassError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be turned into text (corrupt, encrypted or not a PDF).
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The similarity backend could not be initialized.
    #[error("Scoring backend error: {0}")]
    ScoringBackend(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, CareerCompassError>;

/// Model2Vec reports load failures through anyhow
impl From<anyhow::Error> for CareerCompassError {
    fn from(err: anyhow::Error) -> Self {
        CareerCompassError::ScoringBackend(err.to_string())
    }
}

impl CareerCompassError {
    /// Whether the error only concerns a single document of a batch.
    pub fn is_per_document(&self) -> bool {
        matches!(
            self,
            CareerCompassError::Extraction(_) | CareerCompassError::UnsupportedFormat(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_document_classification() {
        assert!(CareerCompassError::Extraction("bad".into()).is_per_document());
        assert!(!CareerCompassError::ScoringBackend("missing".into()).is_per_document());
    }

    #[test]
    fn test_anyhow_conversion_is_backend_error() {
        let err: CareerCompassError = anyhow::anyhow!("no tokenizer").into();
        assert!(matches!(err, CareerCompassError::ScoringBackend(_)));
        assert!(err.to_string().contains("no tokenizer"));
    }
}
