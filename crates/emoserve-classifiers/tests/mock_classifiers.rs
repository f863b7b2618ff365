//! Mock classifiers for testing
//!
//! Configurable implementations of the Classifier trait used to verify the
//! trait contract (ranking order, statelessness per call, error paths)
//! without loading model weights.

use async_trait::async_trait;
use emoserve_classifiers::Classifier;
use emoserve_core::{EmotionScore, Error, Ranking, Result};
use std::sync::atomic::{AtomicU32, Ordering};

/// A mock classifier returning a fixed set of label/score pairs
pub struct MockClassifier {
    model_id: String,
    scores: Vec<EmotionScore>,
    call_count: AtomicU32,
}

impl MockClassifier {
    pub fn new(scores: Vec<EmotionScore>) -> Self {
        Self {
            model_id: "mock-emotion".to_string(),
            scores,
            call_count: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _text: &str) -> Result<Ranking> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(Ranking::from_scores(self.scores.clone()))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// A classifier that always fails - for testing error paths
pub struct FailingClassifier;

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<Ranking> {
        Err(Error::classifier("simulated inference failure"))
    }

    fn model_id(&self) -> &str {
        "failing-mock"
    }
}

#[tokio::test]
async fn mock_returns_descending_ranking() {
    let mock = MockClassifier::new(vec![
        EmotionScore::new("sadness", 0.10),
        EmotionScore::new("anger", 0.81),
        EmotionScore::new("fear", 0.09),
    ]);

    let ranking = mock.classify("you broke my keyboard").await.unwrap();
    assert_eq!(ranking.top().unwrap().label, "anger");
    assert_eq!(ranking.top().unwrap().score, 0.81);

    let scores: Vec<f32> = ranking.iter().map(|s| s.score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn mock_counts_calls() {
    let mock = MockClassifier::new(vec![EmotionScore::new("joy", 1.0)]);

    mock.classify("one").await.unwrap();
    mock.classify("two").await.unwrap();
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn failing_classifier_surfaces_classifier_error() {
    let err = FailingClassifier.classify("anything").await.unwrap_err();
    assert!(matches!(err, Error::Classifier(_)));
}

#[tokio::test]
async fn trait_object_is_usable_behind_arc() {
    use std::sync::Arc;

    let classifier: Arc<dyn Classifier> =
        Arc::new(MockClassifier::new(vec![EmotionScore::new("joy", 0.93)]));

    let mut handles = Vec::new();
    for i in 0..4 {
        let classifier = Arc::clone(&classifier);
        handles.push(tokio::spawn(async move {
            classifier.classify(&format!("text {i}")).await
        }));
    }

    for handle in handles {
        let ranking = handle.await.unwrap().unwrap();
        assert_eq!(ranking.top().unwrap().label, "joy");
    }
}
