use super::{TranslateRequest, TranslationRequest, TranslationResult};
use crate::domain::language::{Capability, LanguageCode, LanguagePolicy, ProviderKind, Resolution};
use crate::domain::shared::{validate_text, ServiceError, ServiceSettings};
use crate::infrastructure::repositories::TranslationRepository;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

pub struct TranslationService {
    policy: LanguagePolicy,
    providers: HashMap<ProviderKind, Arc<dyn TranslationRepository>>,
    settings: ServiceSettings,
}

impl TranslationService {
    pub fn new(
        policy: LanguagePolicy,
        providers: HashMap<ProviderKind, Arc<dyn TranslationRepository>>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            policy,
            providers,
            settings,
        }
    }
}

#[async_trait]
pub trait TranslationServiceApi: Send + Sync {
    /// Translate text into the target language
    ///
    /// This operation:
    /// - Validates text and language codes
    /// - Resolves the provider for the target language
    /// - Calls the provider (retrying only when it was unreachable)
    async fn translate(&self, request: TranslateRequest) -> Result<TranslationResult, ServiceError>;
}

#[async_trait]
impl TranslationServiceApi for TranslationService {
    async fn translate(&self, request: TranslateRequest) -> Result<TranslationResult, ServiceError> {
        // 1. Validate input
        let text = validate_text(&request.text, self.settings.max_text_length)?;
        let target = match request.target.as_deref().map(str::trim) {
            Some(target) if !target.is_empty() => LanguageCode::parse(target)?,
            _ => {
                return Err(ServiceError::InvalidArgument(
                    "Target language is required".to_string(),
                ))
            }
        };
        let source = match request.source.as_deref().map(str::trim) {
            Some(source) if !source.is_empty() && !source.eq_ignore_ascii_case("auto") => {
                Some(LanguageCode::parse(source)?)
            }
            _ => None,
        };

        // 2. Resolve provider for the target language
        let config = match self.policy.resolve(Capability::Translate, &target) {
            Resolution::Supported(config) => config,
            Resolution::Unsupported => {
                tracing::info!(target = %target, "Translation requested for unsupported language");
                return Err(ServiceError::UnsupportedLanguage {
                    capability: Capability::Translate,
                    language: target.to_string(),
                });
            }
        };
        let repository = self.providers.get(&config.provider).ok_or_else(|| {
            ServiceError::Internal(format!("no translation provider for {}", config.provider))
        })?;

        // 3. Call provider
        let provider_request = TranslationRequest {
            text,
            source_lang: source.map(|code| code.to_string()),
            target_lang: config.upstream_language(&target),
        };

        tracing::info!(
            provider = %config.provider,
            source = ?provider_request.source_lang,
            target = %provider_request.target_lang,
            text_length = provider_request.text.len(),
            "Translation request"
        );

        let repository = repository.as_ref();
        let provider_request = &provider_request;
        self.settings
            .retry
            .run("translate", move || repository.translate(provider_request, config))
            .await
            .map_err(|e| ServiceError::upstream(Capability::Translate, e))
    }
}
