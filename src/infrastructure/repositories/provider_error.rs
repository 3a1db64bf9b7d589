use crate::domain::language::ProviderKind;

/// Failure of a single provider call, classified by who is at fault
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// Network failure or timeout; the provider never answered
    #[error("{provider} unavailable: {message}")]
    Unavailable {
        provider: ProviderKind,
        message: String,
    },
    /// The provider refused our parameters (4xx)
    #[error("{provider} rejected the request (status {status:?}): {message}")]
    Rejected {
        provider: ProviderKind,
        status: Option<u16>,
        message: String,
    },
    /// The provider failed (5xx) or answered with something unreadable
    #[error("{provider} error (status {status:?}): {message}")]
    Upstream {
        provider: ProviderKind,
        status: Option<u16>,
        message: String,
    },
}

impl ProviderError {
    /// The request URL is dropped from the message; it may carry an API key
    pub fn from_reqwest(provider: ProviderKind, err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_decode() {
            return Self::malformed(provider, err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::from_status(provider, status.as_u16(), err.to_string());
        }
        // Timeouts, refused connections, reset bodies
        ProviderError::Unavailable {
            provider,
            message: err.to_string(),
        }
    }

    pub fn from_status(provider: ProviderKind, status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if (400..500).contains(&status) {
            ProviderError::Rejected {
                provider,
                status: Some(status),
                message,
            }
        } else {
            ProviderError::Upstream {
                provider,
                status: Some(status),
                message,
            }
        }
    }

    pub fn malformed(provider: ProviderKind, detail: impl Into<String>) -> Self {
        ProviderError::Upstream {
            provider,
            status: None,
            message: format!("malformed response: {}", detail.into()),
        }
    }

    pub fn timeout(provider: ProviderKind, after: std::time::Duration) -> Self {
        ProviderError::Unavailable {
            provider,
            message: format!("timed out after {}s", after.as_secs()),
        }
    }

    pub fn provider(&self) -> ProviderKind {
        match self {
            ProviderError::Unavailable { provider, .. }
            | ProviderError::Rejected { provider, .. }
            | ProviderError::Upstream { provider, .. } => *provider,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Unavailable { .. })
    }

    /// Short, client-safe description of the failure class
    pub fn class(&self) -> &'static str {
        match self {
            ProviderError::Unavailable { .. } => "upstream unavailable",
            ProviderError::Rejected { .. } => "upstream rejected the request",
            ProviderError::Upstream { .. } => "upstream error",
        }
    }
}
