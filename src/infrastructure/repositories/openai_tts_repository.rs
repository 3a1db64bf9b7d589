use super::text_batches::split_into_batches;
use super::{ProviderError, TtsRepository};
use crate::domain::language::{LanguageCode, ProviderConfig, ProviderKind};
use crate::domain::tts::SpeechSynthesisRequest;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{CreateSpeechRequest, SpeechModel, SpeechResponseFormat, Voice},
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// OpenAI has a limit of 4096 characters per request
const MAX_BATCH_SIZE: usize = 4096;

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    default_model: String,
    timeout: Duration,
}

/// Build a client that gives up after the first answer. async-openai
/// otherwise retries 429s with its own backoff until the call times out.
pub fn single_attempt_client(config: OpenAIConfig) -> Client<OpenAIConfig> {
    let backoff = backoff::ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build();
    Client::with_config(config).with_backoff(backoff)
}

impl OpenAiTtsRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, default_model: String, timeout: Duration) -> Self {
        Self {
            client,
            default_model,
            timeout,
        }
    }

    /// Default OpenAI voice for a bare language subtag
    fn voice_for_language(language: &str) -> Voice {
        match language {
            "es" => Voice::Echo,
            "fr" => Voice::Nova,
            "de" => Voice::Onyx,
            "it" => Voice::Fable,
            "pt" => Voice::Shimmer,
            _ => Voice::Alloy,
        }
    }

    fn parse_voice(voice: &str) -> Option<Voice> {
        match voice.to_ascii_lowercase().as_str() {
            "alloy" => Some(Voice::Alloy),
            "echo" => Some(Voice::Echo),
            "fable" => Some(Voice::Fable),
            "onyx" => Some(Voice::Onyx),
            "nova" => Some(Voice::Nova),
            "shimmer" => Some(Voice::Shimmer),
            _ => None,
        }
    }

    fn parse_model(model: &str) -> SpeechModel {
        match model {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        }
    }

    fn classify(err: OpenAIError) -> ProviderError {
        match err {
            // async-openai brings its own reqwest, so classify by inspection
            OpenAIError::Reqwest(e) => match e.status() {
                Some(status) => {
                    ProviderError::from_status(ProviderKind::OpenAi, status.as_u16(), e.to_string())
                }
                None => ProviderError::Unavailable {
                    provider: ProviderKind::OpenAi,
                    message: e.to_string(),
                },
            },
            // The HTTP status is gone by now; the error type still tells 4xx from 5xx
            OpenAIError::ApiError(e) => match e.r#type.as_deref() {
                Some("server_error") | Some("api_error") | Some("service_unavailable") => {
                    ProviderError::Upstream {
                        provider: ProviderKind::OpenAi,
                        status: None,
                        message: e.message,
                    }
                }
                _ => ProviderError::Rejected {
                    provider: ProviderKind::OpenAi,
                    status: None,
                    message: e.message,
                },
            },
            OpenAIError::InvalidArgument(message) => ProviderError::Rejected {
                provider: ProviderKind::OpenAi,
                status: None,
                message,
            },
            other => ProviderError::Upstream {
                provider: ProviderKind::OpenAi,
                status: None,
                message: other.to_string(),
            },
        }
    }

    /// Call OpenAI TTS API to synthesize a single text batch
    async fn call_openai(&self, text: &str, model: &str, voice: &Voice) -> Result<Vec<u8>, ProviderError> {
        tracing::info!(
            model = %model,
            voice = ?voice,
            text_length = text.len(),
            "Calling OpenAI TTS API"
        );

        let request = CreateSpeechRequest {
            model: Self::parse_model(model),
            input: text.to_string(),
            voice: voice.clone(),
            response_format: Some(SpeechResponseFormat::Mp3),
            speed: None,
        };

        let response = tokio::time::timeout(self.timeout, self.client.audio().speech(request))
            .await
            .map_err(|_| ProviderError::timeout(ProviderKind::OpenAi, self.timeout))?
            .map_err(|e| {
                let err = Self::classify(e);
                tracing::error!(
                    error = %err,
                    model = %model,
                    text_length = text.len(),
                    "OpenAI TTS API call failed"
                );
                err
            })?;

        Ok(response.bytes.to_vec())
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    async fn synthesize(
        &self,
        request: &SpeechSynthesisRequest,
        config: &ProviderConfig,
    ) -> Result<Vec<u8>, ProviderError> {
        let start_time = std::time::Instant::now();

        let voice = match request.voice_name.as_deref().or(config.voice.as_deref()) {
            Some(name) => Self::parse_voice(name).ok_or_else(|| ProviderError::Rejected {
                provider: ProviderKind::OpenAi,
                status: None,
                message: format!("unknown OpenAI voice: {}", name),
            })?,
            None => {
                let bare = LanguageCode::parse(&request.language_code)
                    .map(|code| code.language().to_string())
                    .unwrap_or_default();
                Self::voice_for_language(&bare)
            }
        };
        let model = config.model.as_deref().unwrap_or(&self.default_model);

        let batches = split_into_batches(&request.text, MAX_BATCH_SIZE);
        tracing::info!(
            language = %request.language_code,
            voice = ?voice,
            model = %model,
            batch_count = batches.len(),
            text_length = request.text.len(),
            "Starting OpenAI TTS synthesis"
        );

        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio_data = self.call_openai(batch, model, &voice).await?;
            merged_audio.extend(audio_data);

            tracing::debug!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "openai",
            latency_ms = duration.as_millis() as u64,
            characters_count = request.text.chars().count(),
            batch_count = batches.len(),
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(merged_audio)
    }
}
