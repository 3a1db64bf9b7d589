use super::ProviderError;
use crate::domain::language::ProviderConfig;
use crate::domain::translate::{TranslationRequest, TranslationResult};
use async_trait::async_trait;

/// Adapter for a translation provider.
///
/// One call to `translate` performs exactly one upstream request and never
/// retries; failures are classified into `ProviderError`.
#[async_trait]
pub trait TranslationRepository: Send + Sync {
    async fn translate(
        &self,
        request: &TranslationRequest,
        config: &ProviderConfig,
    ) -> Result<TranslationResult, ProviderError>;
}
