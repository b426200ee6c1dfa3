//! Similarity backend on Model2Vec static embeddings
//!
//! A text's embedding is the mean of its token vectors, so scoring compares
//! averaged word vectors with cosine similarity.

use crate::config::Config;
use crate::error::{CareerCompassError, Result};
use crate::processing::similarity::{cosine_similarity, to_score, SimilarityBackend};
use log::info;
use model2vec_rs::model::StaticModel;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub struct EmbeddingBackend {
    model: StaticModel,
    model_name: String,
}

impl EmbeddingBackend {
    /// Load a model from a local folder holding tokenizer.json,
    /// model.safetensors and config.json
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        if !model_path.exists() {
            return Err(CareerCompassError::ScoringBackend(format!(
                "Embedding model '{}' not found at {} (run `career-compass models download {}`)",
                model_name,
                model_path.display(),
                model_name
            )));
        }

        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(model_path, None, None, None).map_err(|e| {
            CareerCompassError::ScoringBackend(format!("Failed to load model '{}': {}", model_name, e))
        })?;

        info!("Model loaded in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }

    /// Load the configured default embedding model
    pub fn from_config(config: &Config) -> Result<Self> {
        let model_name = &config.models.default_embedding_model;
        Self::load(&Self::model_path(config), model_name)
    }

    pub fn model_path(config: &Config) -> PathBuf {
        config.models_dir().join(&config.models.default_embedding_model)
    }

    pub fn encode(&self, text: &str) -> Vec<f32> {
        self.model.encode_single(text)
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl SimilarityBackend for EmbeddingBackend {
    fn score(&self, normalized_a: &str, normalized_b: &str) -> f32 {
        if normalized_a.trim().is_empty() || normalized_b.trim().is_empty() {
            return 0.0;
        }

        let a = self.encode(normalized_a);
        let b = self.encode(normalized_b);
        to_score(cosine_similarity(&a, &b))
    }

    fn name(&self) -> &str {
        "embedding"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_model_is_backend_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = EmbeddingBackend::load(&temp_dir.path().join("potion-base-8M"), "potion-base-8M");

        match result {
            Err(CareerCompassError::ScoringBackend(msg)) => assert!(msg.contains("models download")),
            _ => panic!("expected a scoring backend error"),
        }
    }

    #[test]
    fn test_incomplete_model_dir_is_backend_error() {
        let temp_dir = TempDir::new().unwrap();
        let model_dir = temp_dir.path().join("broken");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join("config.json"), "{}").unwrap();

        let result = EmbeddingBackend::load(&model_dir, "broken");
        assert!(matches!(result, Err(CareerCompassError::ScoringBackend(_))));
    }

    #[test]
    fn test_model_path_from_config() {
        let mut config = Config::default();
        config.models.models_dir = PathBuf::from("/tmp/models");
        config.models.default_embedding_model = "m2v-base".to_string();
        assert_eq!(EmbeddingBackend::model_path(&config), PathBuf::from("/tmp/models/m2v-base"));
    }
}
