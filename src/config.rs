//! Environment-driven configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `BABEL_MT_ADDR` | `127.0.0.1:3000` |
//! | `BABEL_MT_INFERENCE_URL` | `https://api-inference.huggingface.co` |
//! | `HF_API_TOKEN` | unset |
//! | `BABEL_MT_CLASSIFIER_MODEL` | `qanastek/51-languages-classifier` |
//! | `BABEL_MT_TRANSLATION_MODEL` | `facebook/mbart-large-50-many-to-many-mmt` |
//! | `BABEL_MT_DETECTION` | `true` |
//! | `BABEL_MT_MAX_CONCURRENCY` | unset (unlimited) |
//! | `BABEL_MT_TIMEOUT_SECS` | `30` |

use crate::error::{MtError, MtResult};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::Semaphore;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_INFERENCE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "qanastek/51-languages-classifier";
pub const DEFAULT_TRANSLATION_MODEL: &str = "facebook/mbart-large-50-many-to-many-mmt";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Address the web server listens on
    pub addr: SocketAddr,

    // Inference backend
    pub inference_url: String,
    pub api_token: Option<String>,
    pub classifier_model: String,
    pub translation_model: String,
    pub timeout: Duration,

    /// Load the classifier so requests may omit the source language
    pub detection_enabled: bool,
    /// Upper bound on in-flight model invocations, `None` for unlimited
    pub max_concurrency: Option<usize>,
}

impl Config {
    pub fn from_env() -> MtResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> MtResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let max_concurrency = match get("BABEL_MT_MAX_CONCURRENCY") {
            Some(value) => {
                let limit: usize = parse_value("BABEL_MT_MAX_CONCURRENCY", &value)?;
                if limit == 0 || limit > Semaphore::MAX_PERMITS {
                    return Err(MtError::Config(format!(
                        "BABEL_MT_MAX_CONCURRENCY must be between 1 and {}",
                        Semaphore::MAX_PERMITS
                    )));
                }
                Some(limit)
            }
            None => None,
        };

        let timeout_secs = match get("BABEL_MT_TIMEOUT_SECS") {
            Some(value) => parse_value("BABEL_MT_TIMEOUT_SECS", &value)?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(MtError::Config(
                "BABEL_MT_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            addr: parse_value(
                "BABEL_MT_ADDR",
                &get("BABEL_MT_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            )?,
            inference_url: get("BABEL_MT_INFERENCE_URL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_token: get("HF_API_TOKEN"),
            classifier_model: get("BABEL_MT_CLASSIFIER_MODEL")
                .unwrap_or_else(|| DEFAULT_CLASSIFIER_MODEL.to_string()),
            translation_model: get("BABEL_MT_TRANSLATION_MODEL")
                .unwrap_or_else(|| DEFAULT_TRANSLATION_MODEL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            detection_enabled: match get("BABEL_MT_DETECTION") {
                Some(value) => parse_flag("BABEL_MT_DETECTION", &value)?,
                None => true,
            },
            max_concurrency,
        })
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> MtResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| MtError::Config(format!("invalid {} {:?}: {}", key, value, e)))
}

fn parse_flag(key: &str, value: &str) -> MtResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(MtError::Config(format!(
            "invalid {} {:?}: expected true or false",
            key, value
        ))),
    }
}
