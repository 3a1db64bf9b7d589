use crate::domain::language::ProviderKind;
use crate::infrastructure::repositories::ProviderError;
use chrono::Utc;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const TOKEN_LIFETIME_SECS: i64 = 3600;
/// Refresh well before Google expires the token
const TOKEN_CACHE_TTL: Duration = Duration::from_secs(50 * 60);

/// The parts of a service-account key file we need
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        let key = serde_json::from_str(&json)
            .map_err(|e| anyhow::anyhow!("invalid service account key {}: {}", path.display(), e))?;
        Ok(key)
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges a signed JWT for an OAuth access token and caches it
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    http_client: reqwest::Client,
    cache: Cache<(), String>,
}

impl ServiceAccountTokenSource {
    pub fn new(key: ServiceAccountKey, http_client: reqwest::Client) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(TOKEN_CACHE_TTL)
            .build();

        Self {
            key,
            http_client,
            cache,
        }
    }

    pub async fn access_token(&self) -> Result<String, ProviderError> {
        self.cache
            .try_get_with((), self.fetch_token())
            .await
            .map_err(|e: Arc<ProviderError>| (*e).clone())
    }

    async fn fetch_token(&self) -> Result<String, ProviderError> {
        use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &self.key.token_uri,
            exp: now + TOKEN_LIFETIME_SECS,
            iat: now,
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| credentials_error(format!("invalid service account private key: {}", e)))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| credentials_error(format!("failed to sign token request: {}", e)))?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.key.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                let err = ProviderError::from_reqwest(ProviderKind::Google, e);
                tracing::error!(
                    client_email = %self.key.client_email,
                    error = %err,
                    "Google token exchange unreachable"
                );
                err
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                client_email = %self.key.client_email,
                body = %body,
                "Google token exchange failed"
            );
            return Err(ProviderError::from_status(
                ProviderKind::Google,
                status.as_u16(),
                format!("token exchange failed: {}", body),
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Google token response unreadable");
                ProviderError::malformed(ProviderKind::Google, e.without_url().to_string())
            })?;

        tracing::debug!(client_email = %self.key.client_email, "Google access token refreshed");
        Ok(token.access_token)
    }
}

fn credentials_error(message: String) -> ProviderError {
    ProviderError::Rejected {
        provider: ProviderKind::Google,
        status: None,
        message,
    }
}

/// How requests to Google APIs are authorized
#[derive(Clone)]
pub enum GoogleAuth {
    /// Sent as the `key` query parameter
    ApiKey(String),
    /// Bearer token from a service-account key
    ServiceAccount(Arc<ServiceAccountTokenSource>),
}

impl GoogleAuth {
    pub async fn authorize(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ProviderError> {
        match self {
            GoogleAuth::ApiKey(key) => Ok(request.query(&[("key", key.as_str())])),
            GoogleAuth::ServiceAccount(source) => {
                let token = source.access_token().await?;
                Ok(request.bearer_auth(token))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GoogleAuth::ApiKey(_) => "api_key",
            GoogleAuth::ServiceAccount(_) => "service_account",
        }
    }
}

impl std::fmt::Debug for GoogleAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the key
        f.debug_tuple("GoogleAuth").field(&self.kind()).finish()
    }
}
