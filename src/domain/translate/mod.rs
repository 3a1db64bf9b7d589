pub mod dto;
pub mod service;

pub use dto::{TranslateRequest, TranslateResponse};
pub use service::{TranslationService, TranslationServiceApi};

/// Validated translation request handed to a provider
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: Option<String>,
    pub target_lang: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    pub translated_text: String,
    pub detected_source_lang: Option<String>,
}

impl From<TranslationResult> for TranslateResponse {
    fn from(result: TranslationResult) -> Self {
        Self {
            translated_text: result.translated_text,
        }
    }
}
