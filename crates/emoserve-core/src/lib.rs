//! Emoserve Core
//!
//! Shared types and error handling for the emoserve service:
//! - The `Error`/`Result` pair used across all crates
//! - Ranked prediction types produced by classifiers

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{EmotionScore, Ranking};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{EmotionScore, Ranking};
}
