//! Language detection and machine translation on top of pretrained models
//!
//! The models themselves are opaque: a language-identification classifier and
//! an mBART-50 many-to-many translation model, reached through the
//! [`Classifier`] and [`Generator`] traits. This crate canonicalizes language
//! tags into the translation model's code space and orchestrates
//! detection and translation.
//!
//! # Workflow Example
//!
//! ```ignore
//! use babel_mt::{Config, Translator, models_from_config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Connect to the inference backend
//!     let config = Config::from_env()?;
//!     let translator = Translator::new(models_from_config(&config)?);
//!
//!     // 2. Detect the language
//!     let text = "¿Dónde está la biblioteca?";
//!     if let Some(detector) = translator.detector() {
//!         println!("{:?}", detector.detect_probs(text, Some(3)).await?);
//!     }
//!
//!     // 3. Translate, detecting the source language
//!     let result = translator.translate_and_detect(text, None, Some("de")).await?;
//!     println!("{} (from {})", result.text, result.source_language);
//!     Ok(())
//! }
//! ```

pub mod capability;
pub mod config;
pub mod detector;
pub mod error;
pub mod inference;
pub mod languages;
pub mod mock;
pub mod translator;


// Re-export main types for convenient access
pub use capability::{Classifier, Generator, Prediction};
pub use config::Config;
pub use detector::LanguageDetector;
pub use error::{MtError, MtResult};
pub use inference::{HttpClassifier, HttpGenerator, InferenceClient, models_from_config};
pub use languages::{DEFAULT_TARGET_LANGUAGE, LanguageCodeResolver, MBART50_LANGUAGES};
pub use mock::{ClassifierMode, GeneratorMode, MockClassifier, MockGenerator};
pub use translator::{Models, Translation, Translator};
