use super::{ProviderError, SttRepository};
use crate::domain::language::ProviderConfig;
use crate::domain::stt::{TranscriptionRequest, TranscriptionResult};
use crate::infrastructure::google::{endpoint, GoogleClient};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const RECOGNIZE_PATH: &str = "v1/speech:recognize";

#[derive(Debug, Serialize)]
struct RecognizeBody<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_rate_hertz: Option<u32>,
    language_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

/// Google Cloud Speech-to-Text (v1 synchronous recognize) implementation
pub struct GoogleSttRepository {
    client: Arc<GoogleClient>,
    url: String,
}

impl GoogleSttRepository {
    pub fn new(client: Arc<GoogleClient>, base_url: &str) -> Self {
        Self {
            client,
            url: endpoint(base_url, RECOGNIZE_PATH),
        }
    }
}

#[async_trait]
impl SttRepository for GoogleSttRepository {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
        config: &ProviderConfig,
    ) -> Result<TranscriptionResult, ProviderError> {
        let start_time = std::time::Instant::now();

        let body = RecognizeBody {
            config: RecognitionConfig {
                encoding: request.encoding.as_str(),
                sample_rate_hertz: request.sample_rate_hertz,
                language_code: &request.language_code,
                model: config.model.as_deref(),
            },
            audio: RecognitionAudio {
                content: STANDARD.encode(&request.audio),
            },
        };

        let response: RecognizeResponse = self.client.post_json(&self.url, &body).await?;

        // Long audio comes back as several consecutive results
        let text = response
            .results
            .iter()
            .filter_map(|result| result.alternatives.first())
            .map(|alternative| alternative.transcript.trim())
            .filter(|transcript| !transcript.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        tracing::info!(
            provider = "google",
            language = %request.language_code,
            encoding = %request.encoding,
            audio_size_bytes = request.audio.len(),
            result_count = response.results.len(),
            transcript_length = text.len(),
            latency_ms = start_time.elapsed().as_millis() as u64,
            "Transcription completed"
        );

        Ok(TranscriptionResult { text })
    }
}
