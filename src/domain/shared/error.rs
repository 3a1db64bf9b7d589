use crate::domain::language::{Capability, InvalidLanguageCode};
use crate::error::AppError;
use crate::infrastructure::repositories::ProviderError;
use crate::infrastructure::uploads::UploadError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("language {language} is not supported for {capability}")]
    UnsupportedLanguage {
        capability: Capability,
        language: String,
    },
    #[error("{capability} upstream failure: {source}")]
    Upstream {
        capability: Capability,
        #[source]
        source: ProviderError,
    },
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn upstream(capability: Capability, source: ProviderError) -> Self {
        ServiceError::Upstream { capability, source }
    }
}

impl From<InvalidLanguageCode> for ServiceError {
    fn from(err: InvalidLanguageCode) -> Self {
        ServiceError::InvalidArgument(err.to_string())
    }
}

impl From<UploadError> for ServiceError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Io(e) => ServiceError::Internal(format!("upload storage failed: {}", e)),
            other => ServiceError::InvalidArgument(other.to_string()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidArgument(msg) => AppError::BadRequest(msg),
            ServiceError::UnsupportedLanguage {
                capability,
                language,
            } => AppError::UnsupportedLanguage(format!(
                "{} is not available for language {}",
                capability, language
            )),
            // Provider detail was logged where the call failed; clients only see the class
            ServiceError::Upstream { capability, source } => AppError::UpstreamFailure(format!(
                "{} failed: {}",
                capability,
                source.class()
            )),
            ServiceError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
