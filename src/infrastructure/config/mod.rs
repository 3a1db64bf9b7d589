use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Request handling
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub max_text_length: usize,
    pub provider_timeout_secs: u64,
    pub upstream_retries: u32,
    pub default_recognition_language: String,
    pub language_table_path: Option<String>,
    // Google
    pub google_api_key: Option<String>,
    pub google_application_credentials: Option<String>,
    pub google_translate_url: String,
    pub google_tts_url: String,
    pub google_stt_url: String,
    // AWS Polly
    pub aws_region: String,
    // OpenAI
    pub openai_api_key: Option<String>,
    pub openai_tts_model: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            upload_dir: optional_var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_upload_dir),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| (10 * 1024 * 1024).to_string())
                .parse()?,
            max_text_length: env::var("MAX_TEXT_LENGTH")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()?,
            provider_timeout_secs: parse_timeout_secs(
                &env::var("PROVIDER_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string()),
            )?,
            upstream_retries: env::var("UPSTREAM_RETRIES")
                .unwrap_or_else(|_| "0".to_string())
                .parse()?,
            default_recognition_language: env::var("DEFAULT_RECOGNITION_LANGUAGE")
                .unwrap_or_else(|_| "hy-AM".to_string()),
            language_table_path: optional_var("LANGUAGE_TABLE_PATH"),
            google_api_key: optional_var("GOOGLE_API_KEY"),
            google_application_credentials: optional_var("GOOGLE_APPLICATION_CREDENTIALS"),
            google_translate_url: env::var("GOOGLE_TRANSLATE_URL")
                .unwrap_or_else(|_| crate::infrastructure::google::DEFAULT_TRANSLATE_URL.to_string()),
            google_tts_url: env::var("GOOGLE_TTS_URL")
                .unwrap_or_else(|_| crate::infrastructure::google::DEFAULT_TTS_URL.to_string()),
            google_stt_url: env::var("GOOGLE_STT_URL")
                .unwrap_or_else(|_| crate::infrastructure::google::DEFAULT_STT_URL.to_string()),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            openai_api_key: optional_var("OPENAI_API_KEY"),
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn provider_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.provider_timeout_secs)
    }
}

/// Unset and blank both mean "not configured"
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Scoped to this process so a restart never picks up another run's files
fn default_upload_dir() -> PathBuf {
    env::temp_dir().join(format!("lingo-gateway-uploads-{}", std::process::id()))
}

/// A zero timeout would fail every provider call
fn parse_timeout_secs(raw: &str) -> Result<u64, Box<dyn std::error::Error>> {
    let secs: u64 = raw.trim().parse()?;
    if secs == 0 {
        return Err("PROVIDER_TIMEOUT_SECS must be at least 1".into());
    }
    Ok(secs)
}
