//! Plain-data ranking report handed to the formatters

use crate::config::RankingMode;
use crate::input::ExtractionFailure;
use crate::processing::document::{RankedResult, ScoredMatch};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub results: RankingResults,
    /// Documents skipped because their text could not be extracted
    pub failures: Vec<ExtractionFailure>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "entries", rename_all = "kebab-case")]
pub enum RankingResults {
    PerDocument(Vec<RankedResult>),
    Flattened(Vec<ScoredMatch>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: SystemTime,
    pub processing_time_ms: u64,
    pub backend: String,
    pub mode: RankingMode,
    pub reference_count: usize,
    pub documents_ranked: usize,
    pub version: String,
}

impl RankingResults {
    pub fn is_empty(&self) -> bool {
        match self {
            RankingResults::PerDocument(results) => results.is_empty(),
            RankingResults::Flattened(matches) => matches.is_empty(),
        }
    }

    pub fn match_count(&self) -> usize {
        match self {
            RankingResults::PerDocument(results) => results.iter().map(|r| r.matches.len()).sum(),
            RankingResults::Flattened(matches) => matches.len(),
        }
    }

    pub fn per_document(&self) -> Option<&[RankedResult]> {
        match self {
            RankingResults::PerDocument(results) => Some(results),
            RankingResults::Flattened(_) => None,
        }
    }
}

impl RankingReport {
    pub fn generated_at_utc(&self) -> String {
        chrono::DateTime::<chrono::Utc>::from(self.metadata.generated_at)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
    }
}
