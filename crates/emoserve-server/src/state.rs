//! Application state

use anyhow::Result;
use emoserve_classifiers::{BertEmotionClassifier, Classifier};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;

/// Application state shared across all requests.
///
/// The classifier is loaded once at startup and never mutated afterwards;
/// handlers only ever see it behind `Arc<dyn Classifier>`, which keeps the
/// concrete model swappable in tests.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// The shared classifier instance
    pub classifier: Arc<dyn Classifier>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Initialize application state from configuration.
    ///
    /// Loads the pretrained model; failure here is fatal, the process must
    /// not serve requests without a classifier.
    pub async fn new(config: ServerConfig, metrics_handle: PrometheusHandle) -> Result<Self> {
        let source = config.model_source();
        info!("loading emotion classifier from {}", source.id());

        let device = config.model.device;
        let classifier = tokio::task::spawn_blocking(move || {
            BertEmotionClassifier::load(&source, device)
        })
        .await??;

        Ok(Self::with_classifier(config, Arc::new(classifier), metrics_handle))
    }

    /// Build state around an already-constructed classifier (used by tests
    /// to inject mocks)
    pub fn with_classifier(
        config: ServerConfig,
        classifier: Arc<dyn Classifier>,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        Self {
            config: Arc::new(config),
            classifier,
            metrics_handle,
        }
    }
}
