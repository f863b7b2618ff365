//! Server configuration

use clap::Parser;
use emoserve_classifiers::{DeviceKind, ModelSource, DEFAULT_MODEL_ID};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Command-line interface
#[derive(Parser, Debug)]
#[command(name = "emoserve")]
#[command(about = "Emotion analysis HTTP service", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    pub config: String,

    /// Hugging Face repo id of the emotion model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Model revision (branch, tag, or commit)
    #[arg(short, long)]
    pub revision: Option<String>,

    /// Local directory with a pre-downloaded checkpoint
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Listen address
    #[arg(short = 'l', long, default_value = "0.0.0.0")]
    pub listen: String,

    /// Listen port
    #[arg(short = 'P', long, default_value = "8080")]
    pub port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Model settings
    #[serde(default)]
    pub model: ModelSettings,
}

/// Where the pretrained model comes from and how it runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Hugging Face repo id
    #[serde(default = "default_repo_id")]
    pub repo_id: String,

    /// Revision to pin (defaults to "main")
    #[serde(default)]
    pub revision: Option<String>,

    /// Local checkpoint directory; takes precedence over the Hub source
    #[serde(default)]
    pub local_path: Option<PathBuf>,

    /// Inference device
    #[serde(default)]
    pub device: DeviceKind,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            repo_id: default_repo_id(),
            revision: None,
            local_path: None,
            device: DeviceKind::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(model) = &cli.model {
            config.model.repo_id = model.clone();
            config.model.local_path = None;
        }

        if let Some(revision) = &cli.revision {
            config.model.revision = Some(revision.clone());
        }

        if let Some(dir) = &cli.model_dir {
            config.model.local_path = Some(dir.clone());
        }

        Ok(config)
    }

    /// Model source derived from the effective settings
    pub fn model_source(&self) -> ModelSource {
        match &self.model.local_path {
            Some(dir) => ModelSource::local(dir.clone()),
            None => ModelSource::HuggingFace {
                repo_id: self.model.repo_id.clone(),
                revision: self.model.revision.clone(),
            },
        }
    }
}

fn default_repo_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["emoserve"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn defaults_point_at_pretrained_emotion_model() {
        let config = ServerConfig::load("/nonexistent/config.yaml", &cli(&[])).unwrap();
        assert_eq!(config.model.repo_id, DEFAULT_MODEL_ID);
        assert_eq!(config.model.device, DeviceKind::Cpu);
        assert!(matches!(config.model_source(), ModelSource::HuggingFace { .. }));
    }

    #[test]
    fn yaml_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "model:\n  repo_id: acme/custom-emotion\n  revision: v2\n  device: cpu\n",
        )
        .unwrap();

        let config = ServerConfig::load(path.to_str().unwrap(), &cli(&[])).unwrap();
        assert_eq!(config.model.repo_id, "acme/custom-emotion");
        assert_eq!(config.model.revision.as_deref(), Some("v2"));
    }

    #[test]
    fn cli_overrides_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "model:\n  repo_id: acme/from-file\n").unwrap();

        let config = ServerConfig::load(
            path.to_str().unwrap(),
            &cli(&["--model", "acme/from-cli", "--revision", "pinned"]),
        )
        .unwrap();
        assert_eq!(config.model.repo_id, "acme/from-cli");
        assert_eq!(config.model.revision.as_deref(), Some("pinned"));
    }

    #[test]
    fn model_dir_switches_to_local_source() {
        let config = ServerConfig::load(
            "/nonexistent/config.yaml",
            &cli(&["--model-dir", "/models/emotion"]),
        )
        .unwrap();
        assert!(matches!(config.model_source(), ModelSource::Local(_)));
    }
}
