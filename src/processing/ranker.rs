//! Scores every document against every reference description and sorts the results

use crate::processing::document::{Document, RankedResult, ReferenceCorpus, ScoredMatch};
use crate::processing::similarity::SimilarityBackend;
use crate::processing::text_processor::TextNormalizer;
use log::debug;
use std::sync::Arc;

/// Read-only ranking context: the reference corpus, its normalized form, the
/// normalizer and the similarity backend. Built once, shared freely.
pub struct Ranker {
    corpus: ReferenceCorpus,
    normalized_references: Vec<String>,
    normalizer: TextNormalizer,
    backend: Arc<dyn SimilarityBackend>,
}

impl Ranker {
    pub fn new(
        corpus: ReferenceCorpus,
        normalizer: TextNormalizer,
        backend: Arc<dyn SimilarityBackend>,
    ) -> Self {
        // References never change, normalize them once
        let normalized_references = corpus.iter().map(|r| normalizer.normalize(&r.text)).collect();

        Self {
            corpus,
            normalized_references,
            normalizer,
            backend,
        }
    }

    /// Rank every reference for one document, best first.
    ///
    /// Equal scores keep the corpus order.
    pub fn rank_document(&self, document: &Document) -> RankedResult {
        let normalized = self.normalizer.normalize(&document.content);
        debug!(
            "Ranking '{}' ({} normalized terms) with {}",
            document.id,
            normalized.split_whitespace().count(),
            self.backend.name()
        );

        let mut matches: Vec<ScoredMatch> = self
            .corpus
            .iter()
            .zip(&self.normalized_references)
            .enumerate()
            .map(|(index, (reference, normalized_reference))| ScoredMatch {
                document_id: document.id.clone(),
                reference_index: index,
                label: reference.label.clone(),
                reference_text: reference.text.clone(),
                score: self.backend.score(&normalized, normalized_reference),
            })
            .collect();

        sort_matches(&mut matches);

        RankedResult {
            document_id: document.id.clone(),
            matches,
        }
    }

    /// One ranked result per document, in input order
    pub fn rank(&self, documents: &[Document]) -> Vec<RankedResult> {
        documents.iter().map(|doc| self.rank_document(doc)).collect()
    }

    /// Every (document, reference) pair in one list sorted by score.
    ///
    /// Ties keep document order, then reference order.
    pub fn rank_flattened(&self, documents: &[Document]) -> Vec<ScoredMatch> {
        let mut all: Vec<ScoredMatch> = documents
            .iter()
            .flat_map(|doc| {
                let mut matches = self.rank_document(doc).matches;
                // back to corpus order so the global sort breaks ties by reference
                matches.sort_by_key(|m| m.reference_index);
                matches
            })
            .collect();

        sort_matches(&mut all);
        all
    }

    /// Score two raw texts with this ranker's normalizer and backend
    pub fn score_texts(&self, a: &str, b: &str) -> f32 {
        self.backend
            .score(&self.normalizer.normalize(a), &self.normalizer.normalize(b))
    }

    pub fn corpus(&self) -> &ReferenceCorpus {
        &self.corpus
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}

/// Stable sort, highest score first
pub fn sort_matches(matches: &mut [ScoredMatch]) {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::ReferenceDescription;
    use crate::processing::similarity::{TermVectorBackend, MAX_SCORE};

    fn ranker(references: &[(&str, &str)]) -> Ranker {
        let corpus = ReferenceCorpus::new(
            references
                .iter()
                .map(|(label, text)| ReferenceDescription::new(*label, *text))
                .collect(),
        );
        Ranker::new(corpus, TextNormalizer::new(), Arc::new(TermVectorBackend::new()))
    }

    fn scenario_ranker() -> Ranker {
        ranker(&[
            ("software", "software engineer python"),
            ("data", "data analyst sql"),
            ("marketing", "marketing manager social media"),
        ])
    }

    #[test]
    fn test_best_reference_ranked_first() {
        let ranker = scenario_ranker();
        let doc = Document::new("cv.pdf", "experienced python software engineer");

        let result = ranker.rank_document(&doc);

        assert_eq!(result.matches.len(), 3);
        assert_eq!(result.best().unwrap().label, "software");
        assert!(result.matches[0].score > result.matches[1].score);
        assert!(result.matches[0].score > result.matches[2].score);
    }

    #[test]
    fn test_scores_bounded_and_sorted() {
        let ranker = scenario_ranker();
        let doc = Document::new("cv.pdf", "SQL data analyst and python engineer; social media hobbyist");

        let result = ranker.rank_document(&doc);

        assert_eq!(result.matches.len(), ranker.corpus().len());
        for m in &result.matches {
            assert!((0.0..=MAX_SCORE).contains(&m.score));
        }
        for pair in result.matches.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_ties_keep_reference_order() {
        let ranker = scenario_ranker();
        let doc = Document::new("blank.pdf", "");

        let result = ranker.rank_document(&doc);

        let order: Vec<usize> = result.matches.iter().map(|m| m.reference_index).collect();
        assert_eq!(order, [0, 1, 2]);
        assert!(result.matches.iter().all(|m| m.score == 0.0));
    }

    #[test]
    fn test_empty_document_list() {
        let ranker = scenario_ranker();
        assert!(ranker.rank(&[]).is_empty());
        assert!(ranker.rank_flattened(&[]).is_empty());
    }

    #[test]
    fn test_identical_documents_rank_identically() {
        let ranker = scenario_ranker();
        let text = "Data analyst with SQL reporting and some Python";
        let results = ranker.rank(&[Document::new("a.pdf", text), Document::new("b.pdf", text)]);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].matches.len(), results[1].matches.len());
        for (a, b) in results[0].matches.iter().zip(&results[1].matches) {
            assert_eq!(a.reference_index, b.reference_index);
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn test_flattened_orders_globally() {
        let ranker = scenario_ranker();
        let docs = [
            Document::new("marketer.pdf", "marketing manager for social media"),
            Document::new("engineer.pdf", "python software engineer"),
        ];

        let flat = ranker.rank_flattened(&docs);

        assert_eq!(flat.len(), 6);
        for pair in flat.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // both perfect matches first, document order preserved among them
        assert_eq!(flat[0].document_id, "marketer.pdf");
        assert_eq!(flat[0].label, "marketing");
        assert_eq!(flat[1].document_id, "engineer.pdf");
        assert_eq!(flat[1].label, "software");
        // zero-score tail: document order, then reference order
        let tail: Vec<(&str, usize)> = flat[2..]
            .iter()
            .map(|m| (m.document_id.as_str(), m.reference_index))
            .collect();
        assert_eq!(
            tail,
            [("marketer.pdf", 0), ("marketer.pdf", 1), ("engineer.pdf", 1), ("engineer.pdf", 2)]
        );
    }

    #[test]
    fn test_score_texts_symmetric() {
        let ranker = scenario_ranker();
        let a = "Hiring a data analyst with strong SQL skills.";
        let b = "Experienced analyst: SQL, dashboards, data pipelines";
        assert_eq!(ranker.score_texts(a, b), ranker.score_texts(b, a));
        assert_eq!(ranker.score_texts(a, a), MAX_SCORE);
    }
}
