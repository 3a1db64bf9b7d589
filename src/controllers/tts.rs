use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::tts::{TtsRequest, TtsService, TtsServiceApi},
    error::{AppError, AppResult},
};

pub const X_LANGUAGE: &str = "x-language";
pub const X_PROVIDER: &str = "x-provider";

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /speak (alias /tts) - Convert text to speech
    pub async fn speak(
        State(controller): State<Arc<TtsController>>,
        payload: Result<Json<TtsRequest>, JsonRejection>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let Json(request) = payload?;

        let result = controller.tts_service.synthesize(request).await?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, header_value(&result.mime_type)?);
        headers.insert(X_LANGUAGE, header_value(result.language.as_str())?);
        headers.insert(X_PROVIDER, HeaderValue::from_static(result.provider.as_str()));

        Ok((StatusCode::OK, headers, Body::from(result.audio)))
    }
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::Internal(format!("invalid header value {:?}: {}", value, e)))
}
