//! Mock model capabilities for testing
//!
//! Deterministic, network-free stand-ins for the classifier and the
//! translation model, so the detection and translation pipeline can be
//! exercised without an inference backend.
//!
//! # Example
//!
//! ```ignore
//! use babel_mt::{Generator, MockGenerator};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockGenerator::suffix();
//!     let result = mock.generate("hello", "en_XX", "fr_XX").await.unwrap();
//!     assert_eq!(result, vec!["hello_fr_XX"]);
//! }
//! ```

use crate::capability::{Classifier, Generator, Prediction, rank_predictions};
use crate::error::{MtError, MtResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Behaviours of [`MockClassifier`]
#[derive(Debug, Clone)]
pub enum ClassifierMode {
    /// Return the same predictions for every input
    Fixed(Vec<Prediction>),

    /// Look up predictions by exact input text; unknown texts get no predictions
    Mappings(HashMap<String, Vec<Prediction>>),

    /// Simulate a failing model
    Error(String),
}

/// Behaviours of [`MockGenerator`]
#[derive(Debug, Clone)]
pub enum GeneratorMode {
    /// Append the target code: "hello" → "hello_fr_XX"
    Suffix,

    /// (text, target_code) → translation, falling back to `Suffix`
    Mappings(HashMap<(String, String), String>),

    /// Return input unchanged
    NoOp,

    /// Return no sequences at all
    Empty,

    /// Simulate a failing model
    Error(String),
}

/// Mock classifier that ranks and truncates canned predictions like a real one
#[derive(Debug, Clone)]
pub struct MockClassifier {
    mode: ClassifierMode,
    /// Optional simulated inference delay (in milliseconds)
    delay_ms: u64,
}

impl MockClassifier {
    pub fn new(mode: ClassifierMode) -> Self {
        Self { mode, delay_ms: 0 }
    }

    pub fn with_delay(mode: ClassifierMode, delay_ms: u64) -> Self {
        Self { mode, delay_ms }
    }

    /// Classifier answering `predictions` for every text
    ///
    /// ```ignore
    /// let mock = MockClassifier::fixed(&[("es-ES", 0.8), ("pt-PT", 0.2)]);
    /// ```
    pub fn fixed(predictions: &[(&str, f64)]) -> Self {
        Self::new(ClassifierMode::Fixed(
            predictions
                .iter()
                .map(|(label, score)| Prediction::new(*label, *score))
                .collect(),
        ))
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, text: &str, top_k: Option<usize>) -> MtResult<Vec<Prediction>> {
        self.apply_delay().await;

        let predictions = match &self.mode {
            ClassifierMode::Fixed(predictions) => predictions.clone(),
            ClassifierMode::Mappings(map) => map.get(text).cloned().unwrap_or_default(),
            ClassifierMode::Error(msg) => return Err(MtError::Inference(msg.clone())),
        };
        Ok(rank_predictions(predictions, top_k))
    }

    fn provider_name(&self) -> &str {
        "Mock Classifier"
    }
}

/// Mock sequence-to-sequence model
#[derive(Debug, Clone)]
pub struct MockGenerator {
    mode: GeneratorMode,
    /// Optional simulated inference delay (in milliseconds)
    delay_ms: u64,
}

impl MockGenerator {
    pub fn new(mode: GeneratorMode) -> Self {
        Self { mode, delay_ms: 0 }
    }

    pub fn with_delay(mode: GeneratorMode, delay_ms: u64) -> Self {
        Self { mode, delay_ms }
    }

    pub fn suffix() -> Self {
        Self::new(GeneratorMode::Suffix)
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(
        &self,
        text: &str,
        _source_code: &str,
        target_code: &str,
    ) -> MtResult<Vec<String>> {
        self.apply_delay().await;

        match &self.mode {
            GeneratorMode::Suffix => Ok(vec![format!("{}_{}", text, target_code)]),
            GeneratorMode::Mappings(map) => {
                let key = (text.to_string(), target_code.to_string());
                Ok(vec![
                    map.get(&key)
                        .cloned()
                        .unwrap_or_else(|| format!("{}_{}", text, target_code)),
                ])
            }
            GeneratorMode::NoOp => Ok(vec![text.to_string()]),
            GeneratorMode::Empty => Ok(Vec::new()),
            GeneratorMode::Error(msg) => Err(MtError::Inference(msg.clone())),
        }
    }

    fn provider_name(&self) -> &str {
        "Mock Generator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Classifier Tests ==========

    #[tokio::test]
    async fn test_fixed_classifier_ranks_predictions() {
        let mock = MockClassifier::fixed(&[("de-DE", 0.1), ("fr-FR", 0.6), ("it-IT", 0.3)]);
        let result = mock.classify("Bonjour", None).await.unwrap();
        let labels: Vec<&str> = result.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["fr-FR", "it-IT", "de-DE"]);
    }

    #[tokio::test]
    async fn test_fixed_classifier_top_k() {
        let mock = MockClassifier::fixed(&[("de-DE", 0.1), ("fr-FR", 0.6), ("it-IT", 0.3)]);
        let result = mock.classify("Bonjour", Some(1)).await.unwrap();
        assert_eq!(result, vec![Prediction::new("fr-FR", 0.6)]);
    }

    #[tokio::test]
    async fn test_mapping_classifier() {
        let mut map = HashMap::new();
        map.insert("Hola".to_string(), vec![Prediction::new("es-ES", 0.99)]);
        let mock = MockClassifier::new(ClassifierMode::Mappings(map));

        let result = mock.classify("Hola", None).await.unwrap();
        assert_eq!(result[0].label, "es-ES");
        assert!(mock.classify("unknown", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_classifier() {
        let mock = MockClassifier::new(ClassifierMode::Error("model crashed".to_string()));
        let result = mock.classify("Hola", None).await;
        assert_eq!(
            result,
            Err(MtError::Inference("model crashed".to_string()))
        );
    }

    // ========== Generator Tests ==========

    #[tokio::test]
    async fn test_suffix_generator() {
        let mock = MockGenerator::suffix();
        let result = mock.generate("hello", "en_XX", "fr_XX").await.unwrap();
        assert_eq!(result, vec!["hello_fr_XX"]);
    }

    #[tokio::test]
    async fn test_mapping_generator() {
        let mut map = HashMap::new();
        map.insert(
            ("Bonjour".to_string(), "en_XX".to_string()),
            "Hello".to_string(),
        );
        let mock = MockGenerator::new(GeneratorMode::Mappings(map));

        assert_eq!(
            mock.generate("Bonjour", "fr_XX", "en_XX").await.unwrap(),
            vec!["Hello"]
        );
        assert_eq!(
            mock.generate("Salut", "fr_XX", "en_XX").await.unwrap(),
            vec!["Salut_en_XX"]
        );
    }

    #[tokio::test]
    async fn test_noop_and_empty_generators() {
        let noop = MockGenerator::new(GeneratorMode::NoOp);
        assert_eq!(
            noop.generate("same", "en_XX", "de_DE").await.unwrap(),
            vec!["same"]
        );

        let empty = MockGenerator::new(GeneratorMode::Empty);
        assert!(empty.generate("x", "en_XX", "de_DE").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generator_with_delay() {
        let mock = MockGenerator::with_delay(GeneratorMode::Suffix, 20);
        let start = std::time::Instant::now();
        let _ = mock.generate("hello", "en_XX", "fr_XX").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(MockClassifier::fixed(&[]).provider_name(), "Mock Classifier");
        assert_eq!(MockGenerator::suffix().provider_name(), "Mock Generator");
    }
}
