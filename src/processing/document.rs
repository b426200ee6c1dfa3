//! Document and result structures shared by the ranking pipeline

use serde::{Deserialize, Serialize};

/// An uploaded CV after text extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Filename or any caller-chosen identifier
    pub id: String,
    pub content: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub word_count: usize,
    pub character_count: usize,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let word_count = content.split_whitespace().count();
        let character_count = content.chars().count();

        Self {
            id: id.into(),
            content,
            metadata: DocumentMetadata {
                word_count,
                character_count,
            },
        }
    }

    /// Filename without a trailing `.pdf`, the way results are labelled for display
    pub fn display_name(&self) -> &str {
        display_name(&self.id)
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

pub fn display_name(id: &str) -> &str {
    id.strip_suffix(".pdf")
        .or_else(|| id.strip_suffix(".PDF"))
        .unwrap_or(id)
}

/// A job description every document is compared against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDescription {
    pub label: String,
    pub text: String,
}

impl ReferenceDescription {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// The three job descriptions the tool ships with
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(
                "software-engineer",
                "We are looking for a software engineer with experience in Python.",
            ),
            Self::new("data-analyst", "Hiring a data analyst with strong SQL skills."),
            Self::new(
                "marketing-manager",
                "Seeking a marketing manager with social media expertise.",
            ),
        ]
    }
}

/// Ordered, read-only set of reference descriptions.
///
/// Order only matters for breaking ties between equal scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCorpus {
    references: Vec<ReferenceDescription>,
}

impl ReferenceCorpus {
    pub fn new(references: Vec<ReferenceDescription>) -> Self {
        Self { references }
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceDescription> {
        self.references.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ReferenceDescription> {
        self.references.get(index)
    }
}

impl Default for ReferenceCorpus {
    fn default() -> Self {
        Self::new(ReferenceDescription::defaults())
    }
}

impl From<Vec<ReferenceDescription>> for ReferenceCorpus {
    fn from(references: Vec<ReferenceDescription>) -> Self {
        Self::new(references)
    }
}

/// Score of one (document, reference) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub document_id: String,
    /// Position of the reference in its corpus
    pub reference_index: usize,
    pub label: String,
    pub reference_text: String,
    /// Similarity in [0, 100]
    pub score: f32,
}

/// All matches of one document, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub document_id: String,
    pub matches: Vec<ScoredMatch>,
}

impl RankedResult {
    pub fn best(&self) -> Option<&ScoredMatch> {
        self.matches.first()
    }

    pub fn display_name(&self) -> &str {
        display_name(&self.document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_metadata() {
        let doc = Document::new("jane.pdf", "Senior  Python\nengineer");
        assert_eq!(doc.metadata.word_count, 3);
        assert_eq!(doc.display_name(), "jane");
        assert!(!doc.is_blank());
        assert!(Document::new("empty.pdf", "  \n").is_blank());
    }

    #[test]
    fn test_default_corpus_order() {
        let corpus = ReferenceCorpus::default();
        let labels: Vec<&str> = corpus.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["software-engineer", "data-analyst", "marketing-manager"]);
    }
}
