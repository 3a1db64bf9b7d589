pub mod service;

pub use service::{SttService, SttServiceApi};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Audio encodings accepted for transcription, named as Google names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    WebmOpus,
    OggOpus,
    Linear16,
    Flac,
    Mp3,
}

impl AudioEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioEncoding::WebmOpus => "WEBM_OPUS",
            AudioEncoding::OggOpus => "OGG_OPUS",
            AudioEncoding::Linear16 => "LINEAR16",
            AudioEncoding::Flac => "FLAC",
            AudioEncoding::Mp3 => "MP3",
        }
    }

    /// Map an upload's content type (`audio/webm;codecs=opus`) to an encoding
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "audio/webm" | "video/webm" => Some(AudioEncoding::WebmOpus),
            "audio/ogg" | "audio/opus" => Some(AudioEncoding::OggOpus),
            "audio/wav" | "audio/wave" | "audio/x-wav" | "audio/l16" => Some(AudioEncoding::Linear16),
            "audio/flac" | "audio/x-flac" => Some(AudioEncoding::Flac),
            "audio/mpeg" | "audio/mp3" => Some(AudioEncoding::Mp3),
            _ => None,
        }
    }

    /// Opus is always 48 kHz; the other formats carry their rate in a header
    pub fn default_sample_rate(&self) -> Option<u32> {
        match self {
            AudioEncoding::WebmOpus | AudioEncoding::OggOpus => Some(48_000),
            AudioEncoding::Linear16 | AudioEncoding::Flac | AudioEncoding::Mp3 => None,
        }
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated transcription request handed to a provider
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionRequest {
    pub audio: Vec<u8>,
    pub encoding: AudioEncoding,
    pub sample_rate_hertz: Option<u32>,
    pub language_code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    pub text: String,
}

/// Response for POST /recognize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizeResponse {
    pub text: String,
}

impl From<TranscriptionResult> for RecognizeResponse {
    fn from(result: TranscriptionResult) -> Self {
        Self { text: result.text }
    }
}
