//! Language detection on top of a text classifier

use crate::capability::Classifier;
use crate::error::{MtError, MtResult};
use std::sync::Arc;
use tracing::debug;

/// Detects the language of a text with a language-identification classifier
///
/// Labels are returned exactly as the classifier produces them (e.g. `fr-FR`);
/// canonicalization into supported codes happens in the translator.
#[derive(Clone)]
pub struct LanguageDetector {
    classifier: Arc<dyn Classifier>,
}

impl LanguageDetector {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// Label of the most likely language of `text`
    ///
    /// Empty text is passed to the classifier unchanged.
    pub async fn detect(&self, text: &str) -> MtResult<String> {
        let predictions = self.classifier.classify(text, Some(1)).await?;
        let best = predictions.into_iter().next().ok_or_else(|| {
            MtError::Inference(format!(
                "{} returned no predictions",
                self.classifier.provider_name()
            ))
        })?;
        debug!(label = %best.label, score = best.score, "detected language");
        Ok(best.label)
    }

    /// `(label, score)` pairs for `text`, most likely first
    ///
    /// # Arguments
    ///
    /// * `text` - Text to classify
    /// * `top` - Maximum number of pairs, `None` for every label the classifier knows
    pub async fn detect_probs(
        &self,
        text: &str,
        top: Option<usize>,
    ) -> MtResult<Vec<(String, f64)>> {
        let mut predictions = self.classifier.classify(text, top).await?;
        if let Some(k) = top {
            predictions.truncate(k);
        }
        debug!(count = predictions.len(), "detected language probabilities");
        Ok(predictions
            .into_iter()
            .map(|prediction| (prediction.label, prediction.score))
            .collect())
    }

    pub fn provider_name(&self) -> &str {
        self.classifier.provider_name()
    }
}
