use super::ProviderError;
use crate::domain::language::ProviderConfig;
use crate::domain::tts::SpeechSynthesisRequest;
use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (Google, AWS Polly, OpenAI)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Provider-specific voice selection when neither the request nor the
///   policy names a voice
/// - Returning MP3 audio
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text to speech
    ///
    /// # Errors
    /// Returns a classified `ProviderError` if synthesis fails or the
    /// provider is unavailable
    async fn synthesize(
        &self,
        request: &SpeechSynthesisRequest,
        config: &ProviderConfig,
    ) -> Result<Vec<u8>, ProviderError>;
}
