//! Detect-then-translate orchestration
//!
//! The [`Translator`] resolves the source language (explicitly given or
//! detected), canonicalizes source and target into the model's code space and
//! runs the sequence-to-sequence model.
//!
//! # Example
//!
//! ```ignore
//! use babel_mt::{Models, Translator, MockClassifier, MockGenerator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let models = Models::new(Arc::new(MockGenerator::suffix()))
//!         .with_classifier(Arc::new(MockClassifier::fixed(&[("fr-FR", 0.9)])));
//!     let translator = Translator::new(models);
//!
//!     let result = translator.translate_and_detect("Bonjour", None, None).await?;
//!     println!("{} (from {})", result.text, result.source_language);
//!     Ok(())
//! }
//! ```

use crate::capability::{Classifier, Generator};
use crate::detector::LanguageDetector;
use crate::error::{MtError, MtResult};
use crate::languages::{DEFAULT_TARGET_LANGUAGE, LanguageCodeResolver};
use std::sync::Arc;
use tracing::debug;

/// The loaded model capabilities, built once at startup and shared read-only
#[derive(Clone)]
pub struct Models {
    pub classifier: Option<Arc<dyn Classifier>>,
    pub generator: Arc<dyn Generator>,
}

impl Models {
    /// Models without language detection
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            classifier: None,
            generator,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }
}

/// A translated text and the supported code it was translated from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub source_language: &'static str,
}

/// Orchestrates detection, code resolution and generation
#[derive(Clone)]
pub struct Translator {
    generator: Arc<dyn Generator>,
    detector: Option<LanguageDetector>,
    resolver: LanguageCodeResolver,
    default_target: &'static str,
}

impl Translator {
    /// Translator over the mBART-50 code table, defaulting to English output
    pub fn new(models: Models) -> Self {
        Self {
            generator: models.generator,
            detector: models.classifier.map(LanguageDetector::new),
            resolver: LanguageCodeResolver::mbart50(),
            default_target: DEFAULT_TARGET_LANGUAGE,
        }
    }

    /// Use a different code table
    ///
    /// The default target is re-resolved against the new table.
    pub fn with_resolver(mut self, resolver: LanguageCodeResolver) -> MtResult<Self> {
        self.default_target = resolver.resolve(self.default_target)?;
        self.resolver = resolver;
        Ok(self)
    }

    /// Target language used when a request does not name one
    pub fn with_default_target(mut self, target: &str) -> MtResult<Self> {
        self.default_target = self.resolver.resolve(target)?;
        Ok(self)
    }

    pub fn detector(&self) -> Option<&LanguageDetector> {
        self.detector.as_ref()
    }

    pub fn resolver(&self) -> &LanguageCodeResolver {
        &self.resolver
    }

    pub fn default_target(&self) -> &'static str {
        self.default_target
    }

    /// Translate `text` and report the source language that was used
    ///
    /// # Arguments
    ///
    /// * `text` - Text to translate
    /// * `source` - Source language tag, `None` to detect it
    /// * `target` - Target language tag, `None` for the default target
    ///
    /// # Errors
    ///
    /// * `MissingSourceLanguage` - `source` is `None` and detection is not enabled
    /// * `UnsupportedLanguage` - the source or target tag has no supported code
    /// * anything the detector or generator fails with, unchanged
    pub async fn translate_and_detect(
        &self,
        text: &str,
        source: Option<&str>,
        target: Option<&str>,
    ) -> MtResult<Translation> {
        let detected;
        let source_tag = match source {
            Some(tag) => tag,
            None => {
                let detector = self
                    .detector
                    .as_ref()
                    .ok_or(MtError::MissingSourceLanguage)?;
                detected = detector.detect(text).await?;
                detected.as_str()
            }
        };

        let source_code = self.resolver.resolve(source_tag)?;
        let target_code = self.resolver.resolve(target.unwrap_or(self.default_target))?;
        debug!(
            source = source_code,
            target = target_code,
            detected = source.is_none(),
            "translating"
        );

        let sequences = self
            .generator
            .generate(text, source_code, target_code)
            .await?;
        let text = sequences.into_iter().next().ok_or_else(|| {
            MtError::Inference(format!(
                "{} generated no sequences",
                self.generator.provider_name()
            ))
        })?;

        Ok(Translation {
            text,
            source_language: source_code,
        })
    }

    /// Like [`Translator::translate_and_detect`], returning only the text
    pub async fn translate(
        &self,
        text: &str,
        source: Option<&str>,
        target: Option<&str>,
    ) -> MtResult<String> {
        self.translate_and_detect(text, source, target)
            .await
            .map(|translation| translation.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ClassifierMode, GeneratorMode, MockClassifier, MockGenerator};
    use std::collections::HashMap;

    fn with_detector(label: &str) -> Translator {
        let models = Models::new(Arc::new(MockGenerator::suffix()))
            .with_classifier(Arc::new(MockClassifier::fixed(&[(label, 0.9)])));
        Translator::new(models)
    }

    fn without_detector() -> Translator {
        Translator::new(Models::new(Arc::new(MockGenerator::suffix())))
    }

    #[tokio::test]
    async fn test_explicit_languages() {
        let translator = without_detector();
        let result = translator
            .translate_and_detect("Bonjour", Some("fr_FR"), Some("de"))
            .await
            .unwrap();
        assert_eq!(
            result,
            Translation {
                text: "Bonjour_de_DE".to_string(),
                source_language: "fr_XX",
            }
        );
    }

    #[tokio::test]
    async fn test_default_target_is_english() {
        let translator = without_detector();
        let result = translator
            .translate_and_detect("Hola", Some("es"), None)
            .await
            .unwrap();
        assert_eq!(result.text, "Hola_en_XX");
        assert_eq!(result.source_language, "es_XX");
    }

    #[tokio::test]
    async fn test_detects_missing_source() {
        let translator = with_detector("ru-RU");
        let result = translator
            .translate_and_detect("Привет", None, Some("en"))
            .await
            .unwrap();
        assert_eq!(result.source_language, "ru_RU");
        assert_eq!(result.text, "Привет_en_XX");
    }

    #[tokio::test]
    async fn test_explicit_source_skips_detection() {
        let models = Models::new(Arc::new(MockGenerator::suffix())).with_classifier(Arc::new(
            MockClassifier::new(ClassifierMode::Error("must not be called".to_string())),
        ));
        let translator = Translator::new(models);
        let result = translator
            .translate_and_detect("Hallo", Some("de"), None)
            .await
            .unwrap();
        assert_eq!(result.source_language, "de_DE");
    }

    #[tokio::test]
    async fn test_missing_source_without_detector() {
        let translator = without_detector();
        for text in ["", "Bonjour", "日本語のテキスト"] {
            assert_eq!(
                translator.translate_and_detect(text, None, None).await,
                Err(MtError::MissingSourceLanguage)
            );
        }
    }

    #[tokio::test]
    async fn test_unsupported_target() {
        let translator = without_detector();
        assert_eq!(
            translator
                .translate_and_detect("Bonjour", Some("fr"), Some("zz"))
                .await,
            Err(MtError::UnsupportedLanguage("zz".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unsupported_detected_source() {
        // The classifier knows languages the translation model does not
        let translator = with_detector("la-VA");
        assert_eq!(
            translator.translate_and_detect("Salve", None, None).await,
            Err(MtError::UnsupportedLanguage("la-VA".to_string()))
        );
    }

    #[tokio::test]
    async fn test_source_checked_before_target() {
        let translator = without_detector();
        assert_eq!(
            translator
                .translate_and_detect("x", Some("qq"), Some("zz"))
                .await,
            Err(MtError::UnsupportedLanguage("qq".to_string()))
        );
    }

    #[tokio::test]
    async fn test_generator_failures_propagate() {
        let translator = Translator::new(Models::new(Arc::new(MockGenerator::new(
            GeneratorMode::Error("CUDA out of memory".to_string()),
        ))));
        assert_eq!(
            translator.translate("Hola", Some("es"), None).await,
            Err(MtError::Inference("CUDA out of memory".to_string()))
        );
    }

    #[tokio::test]
    async fn test_no_generated_sequence() {
        let translator = Translator::new(Models::new(Arc::new(MockGenerator::new(
            GeneratorMode::Empty,
        ))));
        assert!(matches!(
            translator.translate("Hola", Some("es"), None).await,
            Err(MtError::Inference(_))
        ));
    }

    #[tokio::test]
    async fn test_translate_returns_text_only() {
        let mut map = HashMap::new();
        map.insert(
            ("Bonjour".to_string(), "en_XX".to_string()),
            "Hello".to_string(),
        );
        let models = Models::new(Arc::new(MockGenerator::new(GeneratorMode::Mappings(map))))
            .with_classifier(Arc::new(MockClassifier::fixed(&[("fr-FR", 0.99)])));
        let translator = Translator::new(models);
        assert_eq!(
            translator.translate("Bonjour", None, None).await.unwrap(),
            "Hello"
        );
    }

    #[tokio::test]
    async fn test_custom_default_target() {
        let translator = without_detector().with_default_target("de_AT").unwrap();
        assert_eq!(translator.default_target(), "de_DE");
        let result = translator
            .translate_and_detect("Hello", Some("en"), None)
            .await
            .unwrap();
        assert_eq!(result.text, "Hello_de_DE");

        assert!(without_detector().with_default_target("zz").is_err());
    }

    #[tokio::test]
    async fn test_custom_resolver() {
        static TABLE: &[(&str, &str)] = &[("en_XX", "English"), ("fr_XX", "French")];
        let resolver = LanguageCodeResolver::new(TABLE).unwrap();
        let translator = without_detector().with_resolver(resolver).unwrap();
        assert!(translator.translate("Hallo", Some("de"), None).await.is_err());
        assert_eq!(
            translator.translate("Hello", Some("en"), Some("fr")).await.unwrap(),
            "Hello_fr_XX"
        );
    }

    #[test]
    fn test_detector_presence() {
        assert!(without_detector().detector().is_none());
        assert!(with_detector("en-US").detector().is_some());
    }
}
