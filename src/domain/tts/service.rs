use super::{SpeechSynthesisRequest, SpeechSynthesisResult, TtsRequest, VoiceGender, MP3_MIME_TYPE};
use crate::domain::language::{
    Capability, LanguageCode, LanguageDetector, LanguagePolicy, ProviderKind, Resolution,
};
use crate::domain::shared::{validate_text, ServiceError, ServiceSettings};
use crate::infrastructure::repositories::{ProviderError, TtsRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// `lang` value asking for detection from the text itself
const AUTO_LANGUAGE: &str = "auto";

pub struct TtsService {
    policy: LanguagePolicy,
    providers: HashMap<ProviderKind, Arc<dyn TtsRepository>>,
    language_detector: Arc<LanguageDetector>,
    settings: ServiceSettings,
}

impl TtsService {
    pub fn new(
        policy: LanguagePolicy,
        providers: HashMap<ProviderKind, Arc<dyn TtsRepository>>,
        language_detector: Arc<LanguageDetector>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            policy,
            providers,
            language_detector,
            settings,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize text to speech
    ///
    /// This operation:
    /// - Validates text, language (or detects it for `auto`) and gender
    /// - Resolves provider and voice from the language policy
    /// - Calls the provider, which handles splitting/merging
    ///
    /// Returns MP3 audio along with the language and provider used
    async fn synthesize(&self, request: TtsRequest) -> Result<SpeechSynthesisResult, ServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(&self, request: TtsRequest) -> Result<SpeechSynthesisResult, ServiceError> {
        // 1. Validate input
        let text = validate_text(&request.text, self.settings.max_text_length)?;
        let language = self.language_for(request.lang.as_deref(), &text)?;
        let voice_gender = request
            .gender
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(|g| g.parse::<VoiceGender>())
            .transpose()
            .map_err(ServiceError::InvalidArgument)?;
        let voice_name = request
            .voice
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        // 2. Resolve provider and voice
        let config = match self.policy.resolve(Capability::Synthesize, &language) {
            Resolution::Supported(config) => config,
            Resolution::Unsupported => {
                tracing::info!(language = %language, "Synthesis requested for unsupported language");
                return Err(ServiceError::UnsupportedLanguage {
                    capability: Capability::Synthesize,
                    language: language.to_string(),
                });
            }
        };
        let repository = self.providers.get(&config.provider).ok_or_else(|| {
            ServiceError::Internal(format!("no synthesis provider for {}", config.provider))
        })?;

        let provider_request = SpeechSynthesisRequest {
            text,
            language_code: config.upstream_language(&language),
            voice_name,
            voice_gender,
        };

        tracing::info!(
            provider = %config.provider,
            language = %language,
            upstream_language = %provider_request.language_code,
            voice = ?provider_request.voice_name.as_deref().or(config.voice.as_deref()),
            text_length = provider_request.text.len(),
            "TTS synthesis request"
        );

        // 3. Call provider
        let repository = repository.as_ref();
        let request_ref = &provider_request;
        let audio = self
            .settings
            .retry
            .run("synthesize", move || repository.synthesize(request_ref, config))
            .await
            .and_then(|audio| {
                if audio.is_empty() {
                    Err(ProviderError::malformed(config.provider, "empty audio"))
                } else {
                    Ok(audio)
                }
            })
            .map_err(|e| ServiceError::upstream(Capability::Synthesize, e))?;

        Ok(SpeechSynthesisResult {
            audio,
            mime_type: MP3_MIME_TYPE.to_string(),
            language,
            provider: config.provider,
        })
    }
}

impl TtsService {
    fn language_for(&self, lang: Option<&str>, text: &str) -> Result<LanguageCode, ServiceError> {
        let lang = lang.map(str::trim).unwrap_or_default();
        if lang.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "Language is required".to_string(),
            ));
        }

        if lang.eq_ignore_ascii_case(AUTO_LANGUAGE) {
            let detected = self.language_detector.detect(text).ok_or_else(|| {
                ServiceError::InvalidArgument("Could not detect the language of the text".to_string())
            })?;
            tracing::info!(language_detected = %detected, "Language detected for TTS synthesis");
            return Ok(detected);
        }

        Ok(LanguageCode::parse(lang)?)
    }
}
