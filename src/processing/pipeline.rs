//! End-to-end ranking run: extraction, ranking, filtering and report assembly

use crate::config::{BackendKind, Config, RankingMode};
use crate::error::{CareerCompassError, Result};
use crate::input::{BatchExtraction, ExtractionFailure, InputManager, Upload, UploadBatch};
use crate::output::report::{RankingReport, RankingResults, ReportMetadata};
use crate::processing::document::{Document, ReferenceCorpus, ScoredMatch};
use crate::processing::embeddings::EmbeddingBackend;
use crate::processing::ranker::Ranker;
use crate::processing::similarity::{SimilarityBackend, TermVectorBackend};
use crate::processing::text_processor::TextNormalizer;
use indicatif::ProgressBar;
use log::{info, warn};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

/// Knobs applied after ranking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingSettings {
    pub mode: RankingMode,
    pub min_score: f32,
    pub top_n: Option<usize>,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            mode: RankingMode::PerDocument,
            min_score: 0.0,
            top_n: None,
        }
    }
}

impl From<&Config> for RankingSettings {
    fn from(config: &Config) -> Self {
        Self {
            mode: config.ranking.mode,
            min_score: config.scoring.min_score,
            top_n: config.ranking.top_n,
        }
    }
}

pub struct RankingPipeline {
    input: InputManager,
    ranker: Ranker,
    settings: RankingSettings,
}

/// Build the configured similarity backend.
///
/// Runs once at start-up; a missing model is fatal here, never per request.
pub fn build_backend(config: &Config) -> Result<Arc<dyn SimilarityBackend>> {
    match config.scoring.backend {
        BackendKind::TermVector => Ok(Arc::new(TermVectorBackend::new())),
        BackendKind::Embedding => Ok(Arc::new(EmbeddingBackend::from_config(config)?)),
    }
}

impl RankingPipeline {
    pub fn new(ranker: Ranker, settings: RankingSettings) -> Self {
        Self {
            input: InputManager::new(),
            ranker,
            settings,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        if config.references.is_empty() {
            return Err(CareerCompassError::Configuration(
                "no job descriptions configured to rank against".to_string(),
            ));
        }

        let backend = build_backend(config)?;
        let normalizer =
            TextNormalizer::new().with_extra_stop_words(&config.processing.extra_stop_words);
        let corpus = ReferenceCorpus::new(config.references.clone());

        info!(
            "Ranking pipeline ready: {} backend, {} job descriptions",
            backend.name(),
            corpus.len()
        );

        Ok(Self::new(Ranker::new(corpus, normalizer, backend), RankingSettings::from(config)))
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    pub fn settings(&self) -> &RankingSettings {
        &self.settings
    }

    pub fn run(&self, uploads: &[Upload]) -> RankingReport {
        self.run_with_progress(uploads, None)
    }

    /// Extract and rank a batch of uploads; unreadable files are reported, not fatal
    pub fn run_with_progress(&self, uploads: &[Upload], progress: Option<&ProgressBar>) -> RankingReport {
        let start_time = Instant::now();
        let BatchExtraction { documents, failures } =
            self.input.extract_batch_with_progress(uploads, progress);

        if !failures.is_empty() {
            warn!("{} of {} documents could not be read", failures.len(), uploads.len());
        }

        self.build_report(&documents, failures, start_time)
    }

    /// Rank uploads read from disk; paths that could not be read head the failure list
    pub fn run_batch(&self, batch: &UploadBatch, progress: Option<&ProgressBar>) -> RankingReport {
        let mut report = self.run_with_progress(&batch.uploads, progress);
        if !batch.failures.is_empty() {
            let mut failures = batch.failures.clone();
            failures.append(&mut report.failures);
            report.failures = failures;
        }
        report
    }

    /// Rank already extracted documents
    pub fn rank_documents(&self, documents: &[Document]) -> RankingReport {
        self.build_report(documents, Vec::new(), Instant::now())
    }

    fn build_report(
        &self,
        documents: &[Document],
        failures: Vec<ExtractionFailure>,
        start_time: Instant,
    ) -> RankingReport {
        for doc in documents.iter().filter(|d| d.is_blank()) {
            warn!("{} contains no extractable text, every score will be 0", doc.id);
        }

        let results = match self.settings.mode {
            RankingMode::PerDocument => {
                let mut ranked = self.ranker.rank(documents);
                for result in &mut ranked {
                    self.filter_matches(&mut result.matches);
                }
                RankingResults::PerDocument(ranked)
            }
            RankingMode::Flattened => {
                let mut matches = self.ranker.rank_flattened(documents);
                self.filter_matches(&mut matches);
                RankingResults::Flattened(matches)
            }
        };

        RankingReport {
            results,
            failures,
            metadata: ReportMetadata {
                generated_at: SystemTime::now(),
                processing_time_ms: start_time.elapsed().as_millis() as u64,
                backend: self.ranker.backend_name().to_string(),
                mode: self.settings.mode,
                reference_count: self.ranker.corpus().len(),
                documents_ranked: documents.len(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Drop matches under the minimum score, then cap the list length
    fn filter_matches(&self, matches: &mut Vec<ScoredMatch>) {
        matches.retain(|m| m.score >= self.settings.min_score);
        if let Some(top_n) = self.settings.top_n {
            matches.truncate(top_n);
        }
    }
}
