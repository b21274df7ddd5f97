use thiserror::Error;

/// Error types for language detection and translation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MtError {
    /// A supplied or detected language tag has no supported counterpart
    #[error("unsupported language code: {0}")]
    UnsupportedLanguage(String),

    /// Translation was requested without a source language and no detector is configured
    #[error("src_lang cannot be omitted unless language detection is enabled")]
    MissingSourceLanguage,

    /// Detection was requested but no classifier is configured
    #[error("language detection is not enabled")]
    DetectionDisabled,

    /// Two entries of a language table share the same two-character prefix
    #[error("language codes {first} and {second} share the prefix {prefix:?}")]
    AmbiguousLanguagePrefix {
        prefix: String,
        first: String,
        second: String,
    },

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// The model capability failed or returned something unusable
    #[error("inference error: {0}")]
    Inference(String),

    /// Transport failure while talking to an inference backend
    #[error("network error: {0}")]
    Network(String),
}

impl MtError {
    /// Whether the caller can fix this error by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MtError::UnsupportedLanguage(_)
                | MtError::MissingSourceLanguage
                | MtError::DetectionDisabled
        )
    }
}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MtError::Inference(err.to_string())
        } else {
            MtError::Network(err.to_string())
        }
    }
}

/// Result type for detection and translation operations
pub type MtResult<T> = Result<T, MtError>;
