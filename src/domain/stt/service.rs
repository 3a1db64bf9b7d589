use super::{AudioEncoding, TranscriptionRequest, TranscriptionResult};
use crate::domain::language::{Capability, LanguageCode, LanguagePolicy, ProviderConfig, ProviderKind, Resolution};
use crate::domain::shared::{ServiceError, ServiceSettings};
use crate::infrastructure::repositories::SttRepository;
use crate::infrastructure::uploads::UploadHandle;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// What browsers record when nothing else is known
const FALLBACK_ENCODING: AudioEncoding = AudioEncoding::WebmOpus;

pub struct SttService {
    policy: LanguagePolicy,
    providers: HashMap<ProviderKind, Arc<dyn SttRepository>>,
    default_language: LanguageCode,
    settings: ServiceSettings,
}

impl SttService {
    pub fn new(
        policy: LanguagePolicy,
        providers: HashMap<ProviderKind, Arc<dyn SttRepository>>,
        default_language: LanguageCode,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            policy,
            providers,
            default_language,
            settings,
        }
    }
}

#[async_trait]
pub trait SttServiceApi: Send + Sync {
    /// Transcribe an uploaded audio file
    ///
    /// The upload is released before this returns, whatever the outcome.
    /// `language` falls back to the configured default recognition language.
    async fn transcribe(
        &self,
        upload: Option<UploadHandle>,
        language: Option<String>,
    ) -> Result<TranscriptionResult, ServiceError>;
}

#[async_trait]
impl SttServiceApi for SttService {
    async fn transcribe(
        &self,
        upload: Option<UploadHandle>,
        language: Option<String>,
    ) -> Result<TranscriptionResult, ServiceError> {
        let upload = upload.ok_or_else(|| {
            ServiceError::InvalidArgument("Audio file is required".to_string())
        })?;

        let result = self.transcribe_upload(&upload, language.as_deref()).await;

        let upload_id = upload.id();
        if let Err(e) = upload.release().await {
            tracing::warn!(upload_id = %upload_id, error = %e, "Failed to release upload");
        }

        result
    }
}

impl SttService {
    async fn transcribe_upload(
        &self,
        upload: &UploadHandle,
        language: Option<&str>,
    ) -> Result<TranscriptionResult, ServiceError> {
        // 1. Resolve language and provider
        let language = match language.map(str::trim).filter(|l| !l.is_empty()) {
            Some(code) => LanguageCode::parse(code)?,
            None => self.default_language.clone(),
        };
        let config = match self.policy.resolve(Capability::Transcribe, &language) {
            Resolution::Supported(config) => config,
            Resolution::Unsupported => {
                tracing::info!(language = %language, "Transcription requested for unsupported language");
                return Err(ServiceError::UnsupportedLanguage {
                    capability: Capability::Transcribe,
                    language: language.to_string(),
                });
            }
        };
        let repository = self.providers.get(&config.provider).ok_or_else(|| {
            ServiceError::Internal(format!("no transcription provider for {}", config.provider))
        })?;

        // 2. Load audio
        let audio = upload
            .read()
            .await
            .map_err(|e| ServiceError::Internal(format!("failed to read upload: {}", e)))?;
        if audio.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "Audio file is empty".to_string(),
            ));
        }

        let (encoding, sample_rate_hertz) = audio_format(upload.content_type(), config);
        let provider_request = TranscriptionRequest {
            audio,
            encoding,
            sample_rate_hertz,
            language_code: config.upstream_language(&language),
        };

        tracing::info!(
            upload_id = %upload.id(),
            request_id = %upload.request_id(),
            provider = %config.provider,
            language = %provider_request.language_code,
            encoding = %encoding,
            sample_rate_hertz = ?sample_rate_hertz,
            audio_size_bytes = provider_request.audio.len(),
            "Transcription request"
        );

        // 3. Call provider
        let repository = repository.as_ref();
        let request_ref = &provider_request;
        self.settings
            .retry
            .run("transcribe", move || repository.transcribe(request_ref, config))
            .await
            .map_err(|e| ServiceError::upstream(Capability::Transcribe, e))
    }
}

/// Encoding from the upload's content type when recognized, else the policy's.
/// The policy's sample rate only applies to the policy's own encoding.
fn audio_format(content_type: Option<&str>, config: &ProviderConfig) -> (AudioEncoding, Option<u32>) {
    let encoding = content_type
        .and_then(AudioEncoding::from_mime)
        .or(config.encoding)
        .unwrap_or(FALLBACK_ENCODING);

    let sample_rate = if Some(encoding) == config.encoding {
        config.sample_rate_hertz.or_else(|| encoding.default_sample_rate())
    } else {
        encoding.default_sample_rate()
    };

    (encoding, sample_rate)
}
