//! Candle-based BERT emotion classifier
//!
//! Loads a pretrained BERT sequence-classification checkpoint (encoder,
//! pooler, and classification head) and ranks all emotion labels by softmax
//! probability for a given input text.

use crate::classifier::Classifier;
use crate::hub::{DeviceKind, ModelSource};
use async_trait::async_trait;
use candle_core::{Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use emoserve_core::{EmotionScore, Error, Ranking, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Instant;
use tokenizers::Tokenizer;

/// Pretrained emotion classifier.
///
/// Immutable after construction; all inference state is per-call locals, so
/// one instance can serve concurrent requests behind an `Arc`.
pub struct BertEmotionClassifier {
    model_id: String,
    tokenizer: Tokenizer,
    model: BertModel,
    pooler: Linear,
    head: Linear,
    labels: Vec<String>,
    device: Device,
}

// Manual impl because `BertModel` does not implement `Debug`
impl std::fmt::Debug for BertEmotionClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertEmotionClassifier")
            .field("model_id", &self.model_id)
            .field("labels", &self.labels)
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl BertEmotionClassifier {
    /// Load the classifier from the given source onto the given device.
    ///
    /// Fails if any checkpoint file is missing or malformed; callers treat
    /// this as fatal at startup.
    pub fn load(source: &ModelSource, device: DeviceKind) -> Result<Self> {
        let start = Instant::now();
        let files = source.resolve()?;
        let device = device.create()?;

        let config_text = std::fs::read_to_string(&files.config)?;
        let bert_config: BertConfig = serde_json::from_str(&config_text)?;
        let labels = parse_labels(&config_text)?;

        let tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| Error::classifier(format!("failed to load tokenizer: {e}")))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[files.weights.clone()], DTYPE, &device)
                .map_err(|e| Error::classifier(format!("failed to load weights: {e}")))?
        };

        let model = BertModel::load(vb.clone(), &bert_config)
            .map_err(|e| Error::classifier(format!("failed to load BERT encoder: {e}")))?;

        // The checkpoint is a BertForSequenceClassification export: the CLS
        // position runs through the pooler (dense + tanh) before the head.
        let hidden = bert_config.hidden_size;
        let pooler = candle_nn::linear(hidden, hidden, vb.pp("bert.pooler.dense"))
            .map_err(|e| Error::classifier(format!("failed to load pooler: {e}")))?;
        let head = candle_nn::linear(hidden, labels.len(), vb.pp("classifier"))
            .map_err(|e| Error::classifier(format!("failed to load classification head: {e}")))?;

        tracing::info!(
            model = source.id(),
            labels = labels.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "emotion classifier loaded"
        );

        Ok(Self {
            model_id: source.id(),
            tokenizer,
            model,
            pooler,
            head,
            labels,
            device,
        })
    }

    /// Forward pass producing one probability per label.
    ///
    /// The tokenizer is used exactly as shipped with the checkpoint; inputs
    /// longer than the model's position range surface as inference errors.
    fn probabilities(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::classifier(format!("tokenization failed: {e}")))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::classifier(format!("failed to build input tensor: {e}")))?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::classifier(format!("failed to build token type tensor: {e}")))?;

        let sequence_output = self
            .model
            .forward(&input_ids, &token_type_ids, None)
            .map_err(|e| Error::classifier(format!("model forward pass failed: {e}")))?;

        let probs = sequence_output
            .i((.., 0))
            .and_then(|cls| self.pooler.forward(&cls))
            .and_then(|pooled| pooled.tanh())
            .and_then(|pooled| self.head.forward(&pooled))
            .and_then(|logits| candle_nn::ops::softmax(&logits, D::Minus1))
            .and_then(|probs| probs.squeeze(0))
            .and_then(|probs| probs.to_vec1::<f32>())
            .map_err(|e| Error::classifier(format!("classification head failed: {e}")))?;

        Ok(probs)
    }
}

#[async_trait]
impl Classifier for BertEmotionClassifier {
    async fn classify(&self, text: &str) -> Result<Ranking> {
        let start = Instant::now();
        let probs = self.probabilities(text)?;
        let ranking = ranking_from_probs(&self.labels, &probs);

        tracing::debug!(
            top = ranking.top().map(|s| s.label.as_str()).unwrap_or("<none>"),
            latency_us = start.elapsed().as_micros() as u64,
            "classification complete"
        );

        Ok(ranking)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Pair labels with probabilities and order descending by score
fn ranking_from_probs(labels: &[String], probs: &[f32]) -> Ranking {
    let scores = labels
        .iter()
        .zip(probs.iter())
        .map(|(label, score)| EmotionScore::new(label.clone(), *score))
        .collect();
    Ranking::from_scores(scores)
}

/// Subset of the HF checkpoint config carrying the label map
#[derive(Debug, Deserialize)]
struct LabelConfig {
    #[serde(default)]
    id2label: Option<HashMap<String, String>>,
    #[serde(default)]
    num_labels: Option<usize>,
}

/// Extract the ordered label list from the checkpoint's `config.json`.
///
/// Indices missing from `id2label` get a `LABEL_{i}` placeholder, matching
/// what the reference inference stack reports for unnamed classes.
fn parse_labels(config_text: &str) -> Result<Vec<String>> {
    let label_config: LabelConfig = serde_json::from_str(config_text)?;

    let id2label = label_config.id2label.unwrap_or_default();
    let num_labels = id2label
        .keys()
        .filter_map(|k| k.parse::<usize>().ok())
        .map(|i| i + 1)
        .max()
        .or(label_config.num_labels)
        .ok_or_else(|| Error::config("checkpoint config declares no labels"))?;

    let labels = (0..num_labels)
        .map(|i| {
            id2label
                .get(&i.to_string())
                .cloned()
                .unwrap_or_else(|| format!("LABEL_{i}"))
        })
        .collect();

    Ok(labels)
}
