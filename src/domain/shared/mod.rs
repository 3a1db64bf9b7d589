pub mod error;
pub mod retry;

pub use error::ServiceError;
pub use retry::RetryPolicy;

/// Request limits and retry behaviour shared by the gateway services
#[derive(Debug, Clone, Copy)]
pub struct ServiceSettings {
    pub max_text_length: usize,
    pub retry: RetryPolicy,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            max_text_length: 10_000,
            retry: RetryPolicy::none(),
        }
    }
}

/// Trims `text` and enforces the non-empty and length invariants
pub fn validate_text(text: &str, max_length: usize) -> Result<String, ServiceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidArgument(
            "Text cannot be empty".to_string(),
        ));
    }

    let char_count = trimmed.chars().count();
    if char_count > max_length {
        return Err(ServiceError::InvalidArgument(format!(
            "Text must be {} characters or less (got {})",
            max_length, char_count
        )));
    }

    Ok(trimmed.to_string())
}
