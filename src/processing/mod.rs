//! Text normalization, similarity scoring and ranking

pub mod document;
pub mod embedding_manager;
pub mod embeddings;
pub mod lemmatizer;
pub mod pipeline;
pub mod ranker;
pub mod similarity;
pub mod text_processor;

pub use pipeline::{build_backend, RankingPipeline, RankingSettings};
pub use ranker::Ranker;
pub use similarity::{SimilarityBackend, TermVectorBackend};
pub use text_processor::TextNormalizer;
