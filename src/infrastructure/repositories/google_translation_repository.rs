use super::{ProviderError, TranslationRepository};
use crate::domain::language::{ProviderConfig, ProviderKind};
use crate::domain::translate::{TranslationRequest, TranslationResult};
use crate::infrastructure::google::{endpoint, GoogleClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const TRANSLATE_PATH: &str = "language/translate/v2";

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
    #[serde(default)]
    detected_source_language: Option<String>,
}

/// Google Cloud Translation (v2, basic) implementation
pub struct GoogleTranslationRepository {
    client: Arc<GoogleClient>,
    url: String,
}

impl GoogleTranslationRepository {
    pub fn new(client: Arc<GoogleClient>, base_url: &str) -> Self {
        Self {
            client,
            url: endpoint(base_url, TRANSLATE_PATH),
        }
    }
}

#[async_trait]
impl TranslationRepository for GoogleTranslationRepository {
    async fn translate(
        &self,
        request: &TranslationRequest,
        config: &ProviderConfig,
    ) -> Result<TranslationResult, ProviderError> {
        let start_time = std::time::Instant::now();

        let body = TranslateBody {
            q: &request.text,
            target: &request.target_lang,
            source: request.source_lang.as_deref(),
            format: "text",
            model: config.model.as_deref(),
        };

        let response: TranslateResponse = self.client.post_json(&self.url, &body).await?;
        let translation = response
            .data
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| {
                tracing::error!(provider = "google", target = %request.target_lang, "Google returned no translations");
                ProviderError::malformed(ProviderKind::Google, "no translations returned")
            })?;

        tracing::info!(
            provider = "google",
            target = %request.target_lang,
            detected_source = ?translation.detected_source_language,
            characters_count = request.text.chars().count(),
            latency_ms = start_time.elapsed().as_millis() as u64,
            "Translation completed"
        );

        Ok(TranslationResult {
            translated_text: translation.translated_text,
            detected_source_lang: translation.detected_source_language,
        })
    }
}
