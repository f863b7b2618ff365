//! Model file resolution
//!
//! Resolves the three files a BERT sequence-classification checkpoint needs
//! (`config.json`, `tokenizer.json`, `model.safetensors`) either from the
//! Hugging Face Hub cache or from a local directory.

use candle_core::Device;
use emoserve_core::{Error, Result};
use hf_hub::{api::sync::Api, Repo, RepoType};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const WEIGHTS_FILE: &str = "model.safetensors";

/// Source location for model weights
#[derive(Debug, Clone)]
pub enum ModelSource {
    /// Load from a local directory containing the checkpoint files
    Local(PathBuf),

    /// Download from the Hugging Face Hub
    HuggingFace {
        repo_id: String,
        revision: Option<String>,
    },
}

impl ModelSource {
    /// Create a Hub source for the given repo id at the default revision
    pub fn hub(repo_id: impl Into<String>) -> Self {
        Self::HuggingFace {
            repo_id: repo_id.into(),
            revision: None,
        }
    }

    /// Create a local-directory source
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local(path.into())
    }

    /// Human-readable identifier for logging and `Classifier::model_id`
    pub fn id(&self) -> String {
        match self {
            Self::Local(path) => path.display().to_string(),
            Self::HuggingFace { repo_id, .. } => repo_id.clone(),
        }
    }

    /// Resolve the checkpoint files, downloading from the Hub if needed.
    ///
    /// Hub downloads go through hf-hub's default cache, so repeated startups
    /// reuse already-fetched files.
    pub fn resolve(&self) -> Result<ModelFiles> {
        match self {
            Self::Local(dir) => Self::resolve_local(dir),
            Self::HuggingFace { repo_id, revision } => Self::resolve_hub(repo_id, revision.as_deref()),
        }
    }

    fn resolve_local(dir: &Path) -> Result<ModelFiles> {
        if !dir.is_dir() {
            return Err(Error::config(format!(
                "model directory does not exist: {}",
                dir.display()
            )));
        }

        let files = ModelFiles {
            config: dir.join(CONFIG_FILE),
            tokenizer: dir.join(TOKENIZER_FILE),
            weights: dir.join(WEIGHTS_FILE),
        };

        for path in [&files.config, &files.tokenizer, &files.weights] {
            if !path.exists() {
                return Err(Error::config(format!(
                    "missing model file: {}",
                    path.display()
                )));
            }
        }

        Ok(files)
    }

    fn resolve_hub(repo_id: &str, revision: Option<&str>) -> Result<ModelFiles> {
        tracing::info!(repo_id, revision = revision.unwrap_or("main"), "resolving model from Hugging Face Hub");

        let api = Api::new()
            .map_err(|e| Error::config(format!("failed to initialize Hugging Face API: {e}")))?;

        let repo = api.repo(Repo::with_revision(
            repo_id.to_string(),
            RepoType::Model,
            revision.unwrap_or("main").to_string(),
        ));

        let get = |filename: &str| {
            repo.get(filename).map_err(|e| {
                Error::config(format!("failed to fetch {filename} for {repo_id}: {e}"))
            })
        };

        Ok(ModelFiles {
            config: get(CONFIG_FILE)?,
            tokenizer: get(TOKENIZER_FILE)?,
            weights: get(WEIGHTS_FILE)?,
        })
    }
}

/// Resolved on-disk paths for one checkpoint
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

/// Device to run inference on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// CPU inference (always available)
    #[default]
    Cpu,
    /// CUDA GPU inference (if available)
    Cuda,
    /// Metal (Apple Silicon)
    Metal,
}

impl DeviceKind {
    /// Create the Candle device for this kind
    pub fn create(self) -> Result<Device> {
        match self {
            Self::Cpu => Ok(Device::Cpu),
            Self::Cuda => Device::new_cuda(0)
                .map_err(|e| Error::classifier(format!("failed to initialize CUDA device: {e}"))),
            Self::Metal => Device::new_metal(0)
                .map_err(|e| Error::classifier(format!("failed to initialize Metal device: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_source_requires_existing_directory() {
        let source = ModelSource::local("/nonexistent/model/dir");
        let err = source.resolve().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn local_source_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{}").unwrap();

        let err = ModelSource::local(dir.path()).resolve().unwrap_err();
        assert!(err.to_string().contains("missing model file"));
    }

    #[test]
    fn local_source_resolves_complete_directory() {
        let dir = tempfile::tempdir().unwrap();
        for file in [CONFIG_FILE, TOKENIZER_FILE, WEIGHTS_FILE] {
            std::fs::write(dir.path().join(file), "x").unwrap();
        }

        let files = ModelSource::local(dir.path()).resolve().unwrap();
        assert!(files.tokenizer.ends_with(TOKENIZER_FILE));
    }

    #[test]
    fn source_id_uses_repo_for_hub() {
        let source = ModelSource::hub("bhadresh-savani/bert-base-multilingual-emotion");
        assert_eq!(source.id(), "bhadresh-savani/bert-base-multilingual-emotion");
    }

    #[test]
    fn device_kind_deserializes_lowercase() {
        let kind: DeviceKind = serde_json::from_str("\"cpu\"").unwrap();
        assert_eq!(kind, DeviceKind::Cpu);
    }
}
