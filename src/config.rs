//! Configuration management for career-compass

use crate::error::{CareerCompassError, Result};
use crate::processing::document::ReferenceDescription;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub models: ModelConfig,
    pub processing: ProcessingConfig,
    pub scoring: ScoringConfig,
    pub ranking: RankingConfig,
    pub output: OutputConfig,
    pub references: Vec<ReferenceDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
    pub available_models: Vec<AvailableModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableModel {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub enable_caching: bool,
    /// Extra tokens dropped during normalization, on top of the built-in list
    pub extra_stop_words: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub backend: BackendKind,
    /// Matches below this score (0-100) are left out of the report
    pub min_score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub mode: RankingMode,
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Bag-of-words term vectors, no model required
    TermVector,
    /// Model2Vec static embeddings
    Embedding,
}

/// How results for several documents are returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingMode {
    /// One ranked list per document
    PerDocument,
    /// Every (document, reference) pair in one global list
    Flattened,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".career-compass")
            .join("models");

        Self {
            models_dir,
            default_embedding_model: "potion-base-8M".to_string(),
            available_models: vec![
                AvailableModel {
                    name: "potion-base-8M".to_string(),
                    repo_id: "minishlab/potion-base-8M".to_string(),
                    size_mb: 33,
                    description: "Small Model2Vec embeddings, good quality/size balance".to_string(),
                },
                AvailableModel {
                    name: "m2v-base".to_string(),
                    repo_id: "minishlab/M2V_base_output".to_string(),
                    size_mb: 90,
                    description: "Model2Vec base embeddings model".to_string(),
                },
                AvailableModel {
                    name: "m2v-large".to_string(),
                    repo_id: "minishlab/M2V_large_output".to_string(),
                    size_mb: 250,
                    description: "High-quality Model2Vec large embeddings model".to_string(),
                },
            ],
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            enable_caching: true,
            extra_stop_words: Vec::new(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::TermVector,
            min_score: 0.0,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            mode: RankingMode::PerDocument,
            top_n: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            processing: ProcessingConfig::default(),
            scoring: ScoringConfig::default(),
            ranking: RankingConfig::default(),
            output: OutputConfig::default(),
            references: ReferenceDescription::defaults(),
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CareerCompassError::Configuration(format!(
                "Failed to parse config {}: {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            CareerCompassError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("career-compass")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.scoring.min_score) {
            return Err(CareerCompassError::Configuration(format!(
                "scoring.min_score must be within 0-100, got {}",
                self.scoring.min_score
            )));
        }
        if self.ranking.top_n == Some(0) {
            return Err(CareerCompassError::Configuration(
                "ranking.top_n must be at least 1".to_string(),
            ));
        }
        if let Some(empty) = self.references.iter().find(|r| r.label.trim().is_empty()) {
            return Err(CareerCompassError::Configuration(format!(
                "reference description without a label: {:?}",
                empty.text
            )));
        }
        Ok(())
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_references() {
        let config = Config::default();
        assert_eq!(config.references.len(), 3);
        assert_eq!(config.references[0].label, "software-engineer");
        assert!(config.references[1].text.contains("SQL"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.ranking.mode = RankingMode::Flattened;
        config.scoring.min_score = 12.5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ranking.mode, RankingMode::Flattened);
        assert_eq!(loaded.scoring.min_score, 12.5);
        assert_eq!(loaded.references.len(), config.references.len());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scoring]\nbackend = \"embedding\"\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.scoring.backend, BackendKind::Embedding);
        assert_eq!(loaded.ranking.mode, RankingMode::PerDocument);
        assert_eq!(loaded.references.len(), 3);
    }

    #[test]
    fn test_invalid_min_score_rejected() {
        let mut config = Config::default();
        config.scoring.min_score = 150.0;
        assert!(config.validate().is_err());
    }
}
