//! Remote inference backend
//!
//! Talks to a Hugging Face style inference endpoint
//! (`POST {base_url}/models/{model}` with `{"inputs": ..., "parameters": ...}`),
//! which hosts both the language-identification classifier and the mBART-50
//! translation model. Self-hosted inference servers exposing the same routes
//! work by pointing `BABEL_MT_INFERENCE_URL` at them.
//!
//! # Example
//!
//! ```ignore
//! use babel_mt::{Config, Translator, models_from_config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let translator = Translator::new(models_from_config(&config)?);
//!     let result = translator.translate_and_detect("Bonjour tout le monde", None, None).await?;
//!     println!("{} ({})", result.text, result.source_language);
//!     Ok(())
//! }
//! ```

use crate::capability::{Classifier, Generator, Prediction, rank_predictions};
use crate::config::Config;
use crate::error::{MtError, MtResult};
use crate::translator::Models;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// HTTP client shared by the classifier and the generator
#[derive(Clone)]
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl InferenceClient {
    pub fn new(base_url: &str, api_token: Option<String>, timeout: Duration) -> MtResult<Self> {
        if base_url.trim().is_empty() {
            return Err(MtError::Config("inference URL cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MtError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    pub fn from_config(config: &Config) -> MtResult<Self> {
        Self::new(&config.inference_url, config.api_token.clone(), config.timeout)
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }

    /// Run `model` on `text` and return the raw JSON answer
    async fn infer(&self, model: &str, text: &str, parameters: Value) -> MtResult<Value> {
        let body = json!({
            "inputs": text,
            "parameters": parameters,
        });

        let mut request = self.client.post(self.model_url(model)).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MtError::Inference(format!(
                "{} answered {}: {}",
                model, status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            MtError::Inference(format!("Failed to parse response from {}: {}", model, e))
        })
    }
}

impl std::fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceClient")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Text classification pipelines answer either a flat or a per-input nested list
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<Prediction>>),
    Flat(Vec<Prediction>),
}

#[derive(Deserialize)]
struct GeneratedSequence {
    #[serde(alias = "generated_text")]
    translation_text: String,
}

/// Decode a classification answer into ranked predictions
pub fn parse_predictions(value: Value, top_k: Option<usize>) -> MtResult<Vec<Prediction>> {
    let response: ClassificationResponse = serde_json::from_value(value)
        .map_err(|e| MtError::Inference(format!("Unexpected classification response: {}", e)))?;
    let predictions = match response {
        ClassificationResponse::Nested(nested) => nested.into_iter().flatten().collect(),
        ClassificationResponse::Flat(flat) => flat,
    };
    Ok(rank_predictions(predictions, top_k))
}

/// Decode a translation answer into its generated sequences
pub fn parse_sequences(value: Value) -> MtResult<Vec<String>> {
    let sequences: Vec<GeneratedSequence> = serde_json::from_value(value)
        .map_err(|e| MtError::Inference(format!("Unexpected translation response: {}", e)))?;
    Ok(sequences
        .into_iter()
        .map(|sequence| sequence.translation_text)
        .collect())
}

/// Language-identification classifier served by the inference endpoint
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: InferenceClient,
    model: String,
}

impl HttpClassifier {
    pub fn new(client: InferenceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, text: &str, top_k: Option<usize>) -> MtResult<Vec<Prediction>> {
        let parameters = match top_k {
            Some(k) => json!({ "top_k": k }),
            None => json!({}),
        };
        debug!(model = %self.model, ?top_k, "classifying");
        let value = self.client.infer(&self.model, text, parameters).await?;
        parse_predictions(value, top_k)
    }

    fn provider_name(&self) -> &str {
        &self.model
    }
}

/// mBART-50 style translation model served by the inference endpoint
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: InferenceClient,
    model: String,
}

impl HttpGenerator {
    pub fn new(client: InferenceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(
        &self,
        text: &str,
        source_code: &str,
        target_code: &str,
    ) -> MtResult<Vec<String>> {
        let parameters = json!({
            "src_lang": source_code,
            "tgt_lang": target_code,
        });
        debug!(model = %self.model, source_code, target_code, "generating");
        let value = self.client.infer(&self.model, text, parameters).await?;
        parse_sequences(value)
    }

    fn provider_name(&self) -> &str {
        &self.model
    }
}

/// Build the model capabilities described by `config`
pub fn models_from_config(config: &Config) -> MtResult<Models> {
    let client = InferenceClient::from_config(config)?;
    let models = Models::new(Arc::new(HttpGenerator::new(
        client.clone(),
        config.translation_model.clone(),
    )));
    Ok(if config.detection_enabled {
        models.with_classifier(Arc::new(HttpClassifier::new(
            client,
            config.classifier_model.clone(),
        )))
    } else {
        models
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> InferenceClient {
        InferenceClient::new("http://localhost:8080/", None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_empty_base_url_rejected() {
        match InferenceClient::new("  ", None, Duration::from_secs(5)) {
            Err(MtError::Config(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_model_url() {
        assert_eq!(
            client().model_url("facebook/mbart-large-50-many-to-many-mmt"),
            "http://localhost:8080/models/facebook/mbart-large-50-many-to-many-mmt"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client = InferenceClient::new(
            "http://localhost:8080",
            Some("hf_secret".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("hf_secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_parse_flat_predictions() {
        let value = json!([
            {"label": "fr-FR", "score": 0.1},
            {"label": "es-ES", "score": 0.85},
            {"label": "pt-PT", "score": 0.05}
        ]);
        let predictions = parse_predictions(value, Some(2)).unwrap();
        assert_eq!(
            predictions,
            vec![Prediction::new("es-ES", 0.85), Prediction::new("fr-FR", 0.1)]
        );
    }

    #[test]
    fn test_parse_nested_predictions() {
        let value = json!([[
            {"label": "de-DE", "score": 0.9},
            {"label": "nl-NL", "score": 0.1}
        ]]);
        let predictions = parse_predictions(value, None).unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].label, "de-DE");
    }

    #[test]
    fn test_parse_predictions_rejects_garbage() {
        let value = json!({"error": "Model is currently loading"});
        assert!(matches!(
            parse_predictions(value, None),
            Err(MtError::Inference(_))
        ));
    }

    #[test]
    fn test_parse_sequences() {
        let value = json!([{"translation_text": "Hello everyone"}]);
        assert_eq!(parse_sequences(value).unwrap(), vec!["Hello everyone"]);

        let value = json!([{"generated_text": "Hallo"}]);
        assert_eq!(parse_sequences(value).unwrap(), vec!["Hallo"]);

        assert!(parse_sequences(json!([{"summary_text": "x"}])).is_err());
    }

    #[test]
    fn test_models_from_config() {
        let mut config = Config::from_lookup(|_| None).unwrap();
        let models = models_from_config(&config).unwrap();
        assert!(models.classifier.is_some());
        assert_eq!(
            models.generator.provider_name(),
            "facebook/mbart-large-50-many-to-many-mmt"
        );

        config.detection_enabled = false;
        assert!(models_from_config(&config).unwrap().classifier.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_server_error() {
        // Nothing listens on port 9 of localhost
        let client =
            InferenceClient::new("http://127.0.0.1:9", None, Duration::from_secs(2)).unwrap();
        let classifier = HttpClassifier::new(client, "qanastek/51-languages-classifier");
        let err = classifier.classify("Hola", Some(1)).await.unwrap_err();
        assert!(!err.is_client_error(), "{:?}", err);
    }
}
