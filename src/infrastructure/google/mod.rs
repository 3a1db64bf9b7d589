pub mod credentials;

pub use credentials::{GoogleAuth, ServiceAccountKey, ServiceAccountTokenSource};

use crate::domain::language::ProviderKind;
use crate::infrastructure::repositories::ProviderError;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TRANSLATE_URL: &str = "https://translation.googleapis.com";
pub const DEFAULT_TTS_URL: &str = "https://texttospeech.googleapis.com";
pub const DEFAULT_STT_URL: &str = "https://speech.googleapis.com";

/// Authorized JSON client shared by the Google adapters
#[derive(Debug, Clone)]
pub struct GoogleClient {
    http_client: reqwest::Client,
    auth: GoogleAuth,
}

impl GoogleClient {
    pub fn new(auth: GoogleAuth, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http_client, auth })
    }

    /// Build auth for this process: a service-account key file wins over an API key
    pub fn auth_from(
        api_key: Option<&str>,
        credentials_path: Option<&str>,
        timeout: Duration,
    ) -> anyhow::Result<Option<GoogleAuth>> {
        if let Some(path) = credentials_path {
            let key = ServiceAccountKey::from_file(path)?;
            let http_client = reqwest::Client::builder().timeout(timeout).build()?;
            let source = ServiceAccountTokenSource::new(key, http_client);
            return Ok(Some(GoogleAuth::ServiceAccount(Arc::new(source))));
        }
        Ok(api_key.map(|key| GoogleAuth::ApiKey(key.to_string())))
    }

    pub async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.auth.authorize(self.http_client.post(url).json(body)).await?;

        let response = request.send().await.map_err(|e| {
            let err = ProviderError::from_reqwest(ProviderKind::Google, e);
            tracing::error!(
                provider = "google",
                url = %url,
                error = %err,
                "Google API call failed"
            );
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                provider = "google",
                url = %url,
                status = status.as_u16(),
                body = %error_text,
                "Google API call failed"
            );
            return Err(ProviderError::from_status(
                ProviderKind::Google,
                status.as_u16(),
                error_text,
            ));
        }

        response.json::<R>().await.map_err(|e| {
            let err = ProviderError::malformed(ProviderKind::Google, e.without_url().to_string());
            tracing::error!(
                provider = "google",
                url = %url,
                error = %err,
                "Google API returned an unreadable body"
            );
            err
        })
    }
}

/// Join a configured base URL and an API path without doubling slashes
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
