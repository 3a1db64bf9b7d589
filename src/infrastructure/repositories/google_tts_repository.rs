use super::{ProviderError, TtsRepository};
use crate::domain::language::{ProviderConfig, ProviderKind};
use crate::domain::tts::SpeechSynthesisRequest;
use crate::infrastructure::google::{endpoint, GoogleClient};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SYNTHESIZE_PATH: &str = "v1/text:synthesize";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeBody<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssml_gender: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

/// Google Cloud Text-to-Speech implementation of TTS repository
pub struct GoogleTtsRepository {
    client: Arc<GoogleClient>,
    url: String,
}

impl GoogleTtsRepository {
    pub fn new(client: Arc<GoogleClient>, base_url: &str) -> Self {
        Self {
            client,
            url: endpoint(base_url, SYNTHESIZE_PATH),
        }
    }
}

#[async_trait]
impl TtsRepository for GoogleTtsRepository {
    async fn synthesize(
        &self,
        request: &SpeechSynthesisRequest,
        config: &ProviderConfig,
    ) -> Result<Vec<u8>, ProviderError> {
        let start_time = std::time::Instant::now();

        let voice_name = request.voice_name.as_deref().or(config.voice.as_deref());
        let gender = request.voice_gender.or(config.gender);

        let body = SynthesizeBody {
            input: SynthesisInput {
                text: &request.text,
            },
            voice: VoiceSelection {
                language_code: &request.language_code,
                name: voice_name,
                ssml_gender: gender.map(|g| g.as_str()),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        tracing::info!(
            provider = "google",
            language = %request.language_code,
            voice = ?voice_name,
            gender = ?gender,
            text_length = request.text.len(),
            "Calling Google text:synthesize"
        );

        let response: SynthesizeResponse = self.client.post_json(&self.url, &body).await?;
        let audio = STANDARD
            .decode(response.audio_content.as_bytes())
            .map_err(|e| {
                tracing::error!(provider = "google", error = %e, "Google returned undecodable audioContent");
                ProviderError::malformed(ProviderKind::Google, format!("audioContent: {}", e))
            })?;

        tracing::info!(
            provider = "google",
            latency_ms = start_time.elapsed().as_millis() as u64,
            characters_count = request.text.chars().count(),
            audio_size_bytes = audio.len(),
            "TTS synthesis completed"
        );

        Ok(audio)
    }
}
