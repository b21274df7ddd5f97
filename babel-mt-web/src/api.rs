//! HTTP API: routes, query parameters, responses and error mapping

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use babel_mt::{MtError, Translator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct DetectParams {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DetectProbsParams {
    pub text: String,
    /// Number of candidates; absent or negative means all of them
    pub top: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateParams {
    pub text: String,
    pub src_lang: Option<String>,
    pub dst_lang: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetectResponse {
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetectProbsResponse {
    pub language: Vec<(String, f64)>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translation: String,
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Failure of a request, as seen by the client
#[derive(Debug)]
pub enum ApiError {
    /// The request can be fixed by the caller: 422 with a `detail` message
    Unprocessable(String),
    /// Anything else: 500 without details
    Internal,
}

impl From<MtError> for ApiError {
    fn from(err: MtError) -> Self {
        if err.is_client_error() {
            ApiError::Unprocessable(err.to_string())
        } else {
            error!("Request failed: {}", err);
            ApiError::Internal
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Unprocessable(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unprocessable(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse { detail }),
            )
                .into_response(),
            ApiError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<Translator>,
    /// Bounds the number of in-flight model invocations when set
    pub limiter: Option<Arc<Semaphore>>,
}

impl AppState {
    pub fn new(translator: Translator, max_concurrency: Option<usize>) -> Self {
        Self {
            translator: Arc::new(translator),
            limiter: max_concurrency.map(|limit| Arc::new(Semaphore::new(limit))),
        }
    }

    /// Wait for a model slot; the slot is released when the permit is dropped
    async fn permit(&self) -> Result<Option<OwnedSemaphorePermit>, ApiError> {
        match &self.limiter {
            Some(limiter) => limiter.clone().acquire_owned().await.map(Some).map_err(|e| {
                error!("Model limiter closed: {}", e);
                ApiError::Internal
            }),
            None => Ok(None),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/detect", get(detect_language))
        .route("/detect_probs", get(detect_language_probs))
        .route("/translate", get(translate))
        .route("/languages", get(list_languages))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn detect_language(
    State(state): State<AppState>,
    params: Result<Query<DetectParams>, QueryRejection>,
) -> Result<Json<DetectResponse>, ApiError> {
    let Query(params) = params?;
    let detector = state
        .translator
        .detector()
        .ok_or(MtError::DetectionDisabled)?;

    let _permit = state.permit().await?;
    let language = detector.detect(&params.text).await?;
    info!("Detected {} with {}", language, detector.provider_name());

    Ok(Json(DetectResponse { language }))
}

async fn detect_language_probs(
    State(state): State<AppState>,
    params: Result<Query<DetectProbsParams>, QueryRejection>,
) -> Result<Json<DetectProbsResponse>, ApiError> {
    let Query(params) = params?;
    let detector = state
        .translator
        .detector()
        .ok_or(MtError::DetectionDisabled)?;
    let top = params.top.and_then(|top| usize::try_from(top).ok());

    let _permit = state.permit().await?;
    let language = detector.detect_probs(&params.text, top).await?;

    Ok(Json(DetectProbsResponse { language }))
}

async fn translate(
    State(state): State<AppState>,
    params: Result<Query<TranslateParams>, QueryRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Query(params) = params?;
    // An empty dst_lang falls back to the default target like an absent one
    let target = params.dst_lang.as_deref().filter(|lang| !lang.is_empty());

    let _permit = state.permit().await?;
    let translation = state
        .translator
        .translate_and_detect(&params.text, params.src_lang.as_deref(), target)
        .await?;
    info!(
        "Translated {} chars from {}",
        params.text.chars().count(),
        translation.source_language
    );

    Ok(Json(TranslateResponse {
        translation: translation.text,
        language: translation.source_language.to_string(),
    }))
}

async fn list_languages(State(state): State<AppState>) -> Json<LanguagesResponse> {
    let resolver = state.translator.resolver();
    let languages = resolver
        .codes()
        .map(|code| LanguageInfo {
            code: code.to_string(),
            name: resolver.display_name(code).unwrap_or(code).to_string(),
        })
        .collect();
    Json(LanguagesResponse { languages })
}
