//! Ranked prediction types shared between the classifier and the HTTP layer

use serde::{Deserialize, Serialize};

/// A single label with its confidence score (0.0-1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    /// Emotion label as emitted by the model (e.g. "joy", "anger")
    pub label: String,

    /// Confidence score for this label
    pub score: f32,
}

impl EmotionScore {
    /// Create a new label/score pair
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Full ranked output of a classifier for one input text.
///
/// Scores are ordered descending; the first entry is the model's top
/// prediction. Lifetime is the single request, nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking(pub Vec<EmotionScore>);

impl Ranking {
    /// Build a ranking from unordered label/score pairs, sorting descending
    pub fn from_scores(mut scores: Vec<EmotionScore>) -> Self {
        scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Self(scores)
    }

    /// The highest-scoring prediction, if any
    pub fn top(&self) -> Option<&EmotionScore> {
        self.0.first()
    }

    /// Number of labels in the ranking
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the classifier produced no predictions
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the ranked predictions
    pub fn iter(&self) -> std::slice::Iter<'_, EmotionScore> {
        self.0.iter()
    }
}

impl From<Vec<EmotionScore>> for Ranking {
    fn from(scores: Vec<EmotionScore>) -> Self {
        Self::from_scores(scores)
    }
}

impl IntoIterator for Ranking {
    type Item = EmotionScore;
    type IntoIter = std::vec::IntoIter<EmotionScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
