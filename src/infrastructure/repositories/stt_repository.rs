use super::ProviderError;
use crate::domain::language::ProviderConfig;
use crate::domain::stt::{TranscriptionRequest, TranscriptionResult};
use async_trait::async_trait;

#[async_trait]
pub trait SttRepository: Send + Sync {
    /// Transcribe one audio payload. Empty speech yields an empty transcript,
    /// not an error.
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
        config: &ProviderConfig,
    ) -> Result<TranscriptionResult, ProviderError>;
}
