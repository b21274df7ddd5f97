//! Model capability traits
//!
//! The classifier and the sequence-to-sequence model are opaque to this crate.
//! They are reached through the two traits below, so a remote inference
//! endpoint, a local runtime or a test double can be swapped in without
//! touching the detection and translation logic.
//!
//! # Example
//!
//! ```ignore
//! use babel_mt::{Classifier, Generator, MockClassifier, MockGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let classifier = MockClassifier::fixed(&[("fr-FR", 0.9), ("it-IT", 0.1)]);
//!     let predictions = classifier.classify("Bonjour", Some(1)).await?;
//!     println!("{:?}", predictions);
//!
//!     let generator = MockGenerator::suffix();
//!     let sequences = generator.generate("Bonjour", "fr_XX", "en_XX").await?;
//!     println!("{}", sequences[0]);
//!     Ok(())
//! }
//! ```

use crate::error::MtResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single label produced by a classifier, with its confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f64,
}

impl Prediction {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Text classification capability
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify `text` and return predictions sorted by descending score
    ///
    /// # Arguments
    ///
    /// * `text` - The text to classify, passed through as is
    /// * `top_k` - Maximum number of predictions, `None` for every label
    async fn classify(&self, text: &str, top_k: Option<usize>) -> MtResult<Vec<Prediction>>;

    /// Name of the backend, for logging
    fn provider_name(&self) -> &str;
}

/// Sequence-to-sequence generation capability
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate from `text`, tokenized as `source_code`, forcing `target_code`
    /// as the first generated token
    ///
    /// # Returns
    ///
    /// The decoded output sequences, best first. One sequence per input is expected.
    async fn generate(
        &self,
        text: &str,
        source_code: &str,
        target_code: &str,
    ) -> MtResult<Vec<String>>;

    /// Name of the backend, for logging
    fn provider_name(&self) -> &str;
}

/// Sort predictions by descending score and keep at most `top_k`
pub fn rank_predictions(mut predictions: Vec<Prediction>, top_k: Option<usize>) -> Vec<Prediction> {
    predictions.sort_by(|a, b| b.score.total_cmp(&a.score));
    if let Some(k) = top_k {
        predictions.truncate(k);
    }
    predictions
}
