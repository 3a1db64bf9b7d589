pub mod dto;
pub mod service;

pub use dto::TtsRequest;
pub use service::{TtsService, TtsServiceApi};

use crate::domain::language::{LanguageCode, ProviderKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every provider is asked for MP3
pub const MP3_MIME_TYPE: &str = "audio/mpeg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoiceGender {
    #[serde(alias = "female")]
    Female,
    #[serde(alias = "male")]
    Male,
    #[serde(alias = "neutral")]
    Neutral,
}

impl VoiceGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceGender::Female => "FEMALE",
            VoiceGender::Male => "MALE",
            VoiceGender::Neutral => "NEUTRAL",
        }
    }
}

impl FromStr for VoiceGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FEMALE" => Ok(VoiceGender::Female),
            "MALE" => Ok(VoiceGender::Male),
            "NEUTRAL" => Ok(VoiceGender::Neutral),
            other => Err(format!("unknown voice gender: {}", other)),
        }
    }
}

impl fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated synthesis request handed to a provider
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSynthesisRequest {
    pub text: String,
    /// Code sent upstream, after policy locale overrides
    pub language_code: String,
    pub voice_name: Option<String>,
    pub voice_gender: Option<VoiceGender>,
}

#[derive(Debug, Clone)]
pub struct SpeechSynthesisResult {
    pub audio: Vec<u8>,
    pub mime_type: String,
    pub language: LanguageCode,
    pub provider: ProviderKind,
}
