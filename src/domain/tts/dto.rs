use serde::{Deserialize, Serialize};

/// Request for POST /speak
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TtsRequest {
    #[serde(default)]
    pub text: String,
    /// Language code, or `auto` to detect it from the text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}
