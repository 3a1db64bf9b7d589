use super::text_batches::split_into_batches;
use super::{ProviderError, TtsRepository};
use crate::domain::language::{LanguageCode, ProviderConfig, ProviderKind};
use crate::domain::tts::SpeechSynthesisRequest;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_polly::{
    config::{http::HttpResponse, retry::RetryConfig},
    error::{DisplayErrorContext, SdkError},
    operation::synthesize_speech::SynthesizeSpeechError,
    types::{Engine, LanguageCode as PollyLanguageCode, OutputFormat, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;
use std::time::Duration;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
    timeout: Duration,
}

/// Polly client without the SDK's own retry loop, so one batch is one call
pub fn single_attempt_client(sdk_config: &SdkConfig) -> PollyClient {
    let config = aws_sdk_polly::config::Builder::from(sdk_config)
        .retry_config(RetryConfig::disabled())
        .build();
    PollyClient::from_conf(config)
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>, timeout: Duration) -> Self {
        Self {
            polly_client,
            timeout,
        }
    }

    /// Default Polly voice for a bare language subtag
    fn voice_for_language(language: &str) -> Option<&'static str> {
        match language {
            "en" => Some("Joanna"),
            "es" => Some("Lupe"),
            "fr" => Some("Lea"),
            "de" => Some("Vicki"),
            "it" => Some("Bianca"),
            "pt" => Some("Ines"),
            _ => None,
        }
    }

    fn engine(config: &ProviderConfig) -> Engine {
        match config.model.as_deref() {
            Some(model) => Engine::from(model.to_ascii_lowercase().as_str()),
            None => Engine::Neural,
        }
    }

    fn classify(err: SdkError<SynthesizeSpeechError, HttpResponse>) -> ProviderError {
        let message = DisplayErrorContext(&err).to_string();
        match &err {
            SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => ProviderError::Unavailable {
                provider: ProviderKind::Polly,
                message,
            },
            _ => match err.raw_response().map(|raw| raw.status().as_u16()) {
                Some(status) => ProviderError::from_status(ProviderKind::Polly, status, message),
                None => ProviderError::Upstream {
                    provider: ProviderKind::Polly,
                    status: None,
                    message,
                },
            },
        }
    }

    /// Call AWS Polly to synthesize a single text batch
    async fn call_polly(
        &self,
        text: &str,
        voice_id: &VoiceId,
        engine: &Engine,
        language_code: Option<&PollyLanguageCode>,
    ) -> Result<Vec<u8>, ProviderError> {
        tracing::info!(
            voice_id = ?voice_id,
            engine = ?engine,
            language_code = ?language_code,
            output_format = "Mp3",
            text_length = text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let call = self
            .polly_client
            .synthesize_speech()
            .text(text)
            .voice_id(voice_id.clone())
            .output_format(OutputFormat::Mp3)
            .engine(engine.clone())
            .set_language_code(language_code.cloned())
            .send();

        let result = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ProviderError::timeout(ProviderKind::Polly, self.timeout))?
            .map_err(|e| {
                let err = Self::classify(e);
                tracing::error!(
                    error = %err,
                    voice_id = ?voice_id,
                    engine = ?engine,
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                err
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            ProviderError::Unavailable {
                provider: ProviderKind::Polly,
                message: format!("failed to read audio stream: {}", e),
            }
        })?;

        Ok(audio_stream.into_bytes().to_vec())
    }
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(
        &self,
        request: &SpeechSynthesisRequest,
        config: &ProviderConfig,
    ) -> Result<Vec<u8>, ProviderError> {
        let start_time = std::time::Instant::now();

        let language = LanguageCode::parse(&request.language_code).map_err(|e| {
            ProviderError::Rejected {
                provider: ProviderKind::Polly,
                status: None,
                message: e.to_string(),
            }
        })?;

        let voice_name = match request.voice_name.as_deref().or(config.voice.as_deref()) {
            Some(voice) => voice,
            None => Self::voice_for_language(language.language()).ok_or_else(|| {
                ProviderError::Rejected {
                    provider: ProviderKind::Polly,
                    status: None,
                    message: format!("no Polly voice configured for {}", language),
                }
            })?,
        };
        let voice_id = VoiceId::from(voice_name);
        let engine = Self::engine(config);
        // Bilingual voices need an explicit locale; bare codes let the voice decide
        let language_code = language
            .region()
            .map(|_| PollyLanguageCode::from(language.as_str()));

        let batches = split_into_batches(&request.text, MAX_BATCH_SIZE);
        tracing::info!(
            batch_count = batches.len(),
            text_length = request.text.len(),
            "Text split into batches"
        );

        let mut merged_audio = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let audio_data = self
                .call_polly(batch, &voice_id, &engine, language_code.as_ref())
                .await?;
            merged_audio.extend(audio_data);

            tracing::debug!(
                batch_index = index,
                total_audio_size = merged_audio.len(),
                "Batch synthesized and merged"
            );
        }

        let duration = start_time.elapsed();
        tracing::info!(
            provider = "polly",
            latency_ms = duration.as_millis() as u64,
            characters_count = request.text.chars().count(),
            batch_count = batches.len(),
            audio_size_bytes = merged_audio.len(),
            "TTS synthesis completed"
        );

        Ok(merged_audio)
    }
}
