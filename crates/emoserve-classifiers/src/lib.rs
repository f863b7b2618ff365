//! Emoserve Classifiers
//!
//! The classifier capability of the emoserve service: a trait describing
//! "given text, return ranked label/score pairs" and the Candle-based
//! implementation that loads a pretrained BERT sequence-classification
//! checkpoint from the Hugging Face Hub.
//!
//! The concrete model is held behind `dyn Classifier` so the HTTP layer can
//! be tested against mocks without any model files on disk.

pub mod bert;
pub mod classifier;
pub mod hub;

pub use bert::BertEmotionClassifier;
pub use classifier::Classifier;
pub use hub::{DeviceKind, ModelFiles, ModelSource};

/// Model identifier the service loads when nothing else is configured.
pub const DEFAULT_MODEL_ID: &str = "bhadresh-savani/bert-base-multilingual-emotion";

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bert::BertEmotionClassifier;
    pub use crate::classifier::Classifier;
    pub use crate::hub::{DeviceKind, ModelFiles, ModelSource};
    pub use crate::DEFAULT_MODEL_ID;
}
