//! Embedding model management: download, scan and remove Model2Vec models

use crate::config::{AvailableModel, Config};
use crate::error::{CareerCompassError, Result};
use hf_hub::api::tokio::Api;
use log::{debug, info};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files a model folder must hold to be loadable
const REQUIRED_FILES: [&str; 3] = ["tokenizer.json", "model.safetensors", "config.json"];
const OPTIONAL_FILES: [&str; 1] = ["README.md"];

/// Manager for embedding models, backed by a models directory on disk
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: Vec<AvailableModel>,
    downloaded_models: BTreeSet<String>,
    api: Option<Api>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf, available_models: Vec<AvailableModel>) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                CareerCompassError::ModelError(format!("Failed to create models directory: {}", e))
            })?;
        }

        let mut manager = Self {
            models_dir,
            available_models,
            downloaded_models: BTreeSet::new(),
            api: None,
        };
        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.models_dir().clone(), config.models.available_models.clone()).await
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Rebuild the set of downloaded models from the models directory
    pub async fn scan_downloaded_models(&mut self) -> Result<()> {
        self.downloaded_models.clear();

        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            CareerCompassError::ModelError(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if is_valid_model_directory(&entry.path()).await {
                let model_id = entry.file_name().to_string_lossy().to_string();
                debug!("Found downloaded model: {}", model_id);
                self.downloaded_models.insert(model_id);
            }
        }

        Ok(())
    }

    /// Download a model from Hugging Face Hub into the models directory
    pub async fn download_model(&mut self, model_id: &str, force: bool) -> Result<PathBuf> {
        let model_info = self
            .get_model_info(model_id)
            .cloned()
            .ok_or_else(|| CareerCompassError::ModelNotFound(model_id.to_string()))?;

        let model_dir = self.models_dir.join(&model_info.name);

        if self.is_model_downloaded(&model_info.name) && !force {
            info!("Model {} already downloaded", model_info.name);
            return Ok(model_dir);
        }

        println!("📥 Downloading embedding model: {} (~{} MB)", model_info.name, model_info.size_mb);
        println!("📍 Repository: {}", model_info.repo_id);

        fs::create_dir_all(&model_dir).await.map_err(|e| {
            CareerCompassError::ModelError(format!("Failed to create model directory: {}", e))
        })?;

        let repo = self.api()?.model(model_info.repo_id.clone());

        for file in REQUIRED_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                CareerCompassError::ModelError(format!("Failed to download required file {}: {}", file, e))
            })?;
            fs::copy(&cached, model_dir.join(file)).await.map_err(|e| {
                CareerCompassError::ModelError(format!("Failed to copy {}: {}", file, e))
            })?;
            println!("  ✅ Downloaded: {}", file);
        }

        for file in OPTIONAL_FILES {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await?;
                }
                Err(e) => debug!("Optional file {} not available: {}", file, e),
            }
        }

        self.downloaded_models.insert(model_info.name.clone());
        println!("✅ Embedding model {} downloaded successfully!", model_info.name);

        Ok(model_dir)
    }

    /// Delete a downloaded model folder
    pub async fn remove_model(&mut self, model_id: &str) -> Result<()> {
        let id = self
            .resolve_model_id(model_id)
            .unwrap_or_else(|| model_id.to_string());

        if !self.downloaded_models.contains(&id) {
            return Err(CareerCompassError::ModelNotFound(format!("{} is not downloaded", model_id)));
        }

        fs::remove_dir_all(self.models_dir.join(&id)).await?;
        self.downloaded_models.remove(&id);
        info!("Removed model {}", id);

        Ok(())
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        if self.downloaded_models.contains(model_id) {
            Some(self.models_dir.join(model_id))
        } else {
            None
        }
    }

    pub fn list_available_models(&self) -> &[AvailableModel] {
        &self.available_models
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        self.downloaded_models.iter().cloned().collect()
    }

    /// First downloaded model in catalogue order, else the first catalogue entry
    pub fn auto_select_model(&self) -> Option<String> {
        self.available_models
            .iter()
            .find(|m| self.downloaded_models.contains(&m.name))
            .or_else(|| self.available_models.first())
            .map(|m| m.name.clone())
    }

    /// Look up a model by id or repository id
    pub fn get_model_info(&self, model_id: &str) -> Option<&AvailableModel> {
        self.available_models
            .iter()
            .find(|m| m.name == model_id || m.repo_id == model_id)
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    /// Resolve a model id from its id, repository id or a case-insensitive name
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if let Some(info) = self.get_model_info(input) {
            return Some(info.name.clone());
        }

        let input_lower = input.to_lowercase();
        self.available_models
            .iter()
            .find(|m| m.name.to_lowercase() == input_lower)
            .map(|m| m.name.clone())
    }

    fn api(&mut self) -> Result<&Api> {
        if self.api.is_none() {
            let api = Api::new().map_err(|e| {
                CareerCompassError::ModelError(format!("Failed to initialize HF API: {}", e))
            })?;
            self.api = Some(api);
        }
        self.api
            .as_ref()
            .ok_or_else(|| CareerCompassError::ModelError("HF API unavailable".to_string()))
    }
}

async fn is_valid_model_directory(path: &Path) -> bool {
    for file in REQUIRED_FILES {
        if fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn manager(temp_dir: &TempDir) -> EmbeddingModelManager {
        let catalogue = crate::config::ModelConfig::default().available_models;
        EmbeddingModelManager::new(temp_dir.path().to_path_buf(), catalogue)
            .await
            .unwrap()
    }

    async fn fake_model(temp_dir: &TempDir, name: &str) {
        let dir = temp_dir.path().join(name);
        fs::create_dir_all(&dir).await.unwrap();
        for file in REQUIRED_FILES {
            fs::write(dir.join(file), b"{}").await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_manager_creation() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir).await;

        assert_eq!(manager.list_available_models().len(), 3);
        assert!(manager.list_downloaded_models().is_empty());
    }

    #[tokio::test]
    async fn test_auto_select_model() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(manager(&temp_dir).await.auto_select_model().as_deref(), Some("potion-base-8M"));

        fake_model(&temp_dir, "m2v-large").await;
        let manager = manager(&temp_dir).await;
        assert_eq!(manager.auto_select_model().as_deref(), Some("m2v-large"));
    }

    #[tokio::test]
    async fn test_scan_ignores_incomplete_folders() {
        let temp_dir = TempDir::new().unwrap();
        fake_model(&temp_dir, "potion-base-8M").await;
        let partial = temp_dir.path().join("m2v-base");
        fs::create_dir_all(&partial).await.unwrap();
        fs::write(partial.join("tokenizer.json"), b"{}").await.unwrap();

        let manager = manager(&temp_dir).await;

        assert!(manager.is_model_downloaded("potion-base-8M"));
        assert!(!manager.is_model_downloaded("m2v-base"));
        assert!(manager.get_model_path("potion-base-8M").is_some());
    }

    #[tokio::test]
    async fn test_resolve_model_id() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir).await;

        assert_eq!(manager.resolve_model_id("potion-base-8M"), Some("potion-base-8M".to_string()));
        assert_eq!(
            manager.resolve_model_id("minishlab/potion-base-8M"),
            Some("potion-base-8M".to_string())
        );
        assert_eq!(manager.resolve_model_id("POTION-BASE-8M"), Some("potion-base-8M".to_string()));
        assert_eq!(manager.resolve_model_id("gpt-2"), None);
    }

    #[tokio::test]
    async fn test_remove_model() {
        let temp_dir = TempDir::new().unwrap();
        fake_model(&temp_dir, "potion-base-8M").await;
        let mut manager = manager(&temp_dir).await;

        manager.remove_model("potion-base-8M").await.unwrap();

        assert!(!manager.is_model_downloaded("potion-base-8M"));
        assert!(!temp_dir.path().join("potion-base-8M").exists());
        assert!(matches!(
            manager.remove_model("potion-base-8M").await,
            Err(CareerCompassError::ModelNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_download_unknown_model() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = manager(&temp_dir).await;
        assert!(matches!(
            manager.download_model("not-a-model", false).await,
            Err(CareerCompassError::ModelNotFound(_))
        ));
    }
}
