use super::code::{InvalidLanguageCode, LanguageCode};
use crate::domain::stt::AudioEncoding;
use crate::domain::tts::VoiceGender;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The three things the gateway can do with a language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Translate,
    Synthesize,
    Transcribe,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::Translate,
        Capability::Synthesize,
        Capability::Transcribe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Translate => "translate",
            Capability::Synthesize => "synthesize",
            Capability::Transcribe => "transcribe",
        }
    }

    /// Providers able to serve this capability at all
    pub fn providers(&self) -> &'static [ProviderKind] {
        match self {
            Capability::Translate => &[ProviderKind::Google],
            Capability::Synthesize => &[ProviderKind::Google, ProviderKind::Polly, ProviderKind::OpenAi],
            Capability::Transcribe => &[ProviderKind::Google],
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "google")]
    Google,
    #[serde(rename = "polly")]
    Polly,
    #[serde(rename = "openai")]
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Google => "google",
            ProviderKind::Polly => "polly",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which provider handles a language, and how.
///
/// Every field except `provider` is optional; adapters fall back to their
/// own defaults when a field is unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    /// Provider voice name (`hy-AM-Standard-A`, `Joanna`, `nova`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<VoiceGender>,
    /// Code sent upstream instead of the requested one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<AudioEncoding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate_hertz: Option<u32>,
    /// Provider model or engine (`neural`, `tts-1-hd`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ProviderConfig {
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            voice: None,
            gender: None,
            locale: None,
            encoding: None,
            sample_rate_hertz: None,
            model: None,
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn with_gender(mut self, gender: VoiceGender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_encoding(mut self, encoding: AudioEncoding, sample_rate_hertz: Option<u32>) -> Self {
        self.encoding = Some(encoding);
        self.sample_rate_hertz = sample_rate_hertz;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The language code to send upstream for a request in `language`
    pub fn upstream_language(&self, language: &LanguageCode) -> String {
        self.locale
            .clone()
            .unwrap_or_else(|| language.as_str().to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error(transparent)]
    InvalidLanguageCode(#[from] InvalidLanguageCode),
    #[error("provider {provider} cannot serve capability {capability}")]
    UnsupportedProvider {
        capability: Capability,
        provider: ProviderKind,
    },
    #[error("failed to parse language table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read language table {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Per-capability entries. `None` marks a language explicitly unsupported.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CapabilityEntries {
    #[serde(default)]
    default: Option<ProviderConfig>,
    #[serde(default)]
    languages: HashMap<String, Option<ProviderConfig>>,
}

/// Immutable mapping from (capability, language) to a provider configuration.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone, Default)]
pub struct LanguageSupportTable {
    capabilities: HashMap<Capability, CapabilityEntries>,
}

impl LanguageSupportTable {
    pub fn builder() -> LanguageSupportTableBuilder {
        LanguageSupportTableBuilder::default()
    }

    /// Every language on Google: female MP3 voices for synthesis and
    /// 48 kHz WebM/Opus for transcription (what browsers record).
    pub fn builtin() -> Self {
        let mut capabilities = HashMap::new();
        capabilities.insert(
            Capability::Translate,
            CapabilityEntries {
                default: Some(ProviderConfig::new(ProviderKind::Google)),
                languages: HashMap::new(),
            },
        );
        capabilities.insert(
            Capability::Synthesize,
            CapabilityEntries {
                default: Some(
                    ProviderConfig::new(ProviderKind::Google).with_gender(VoiceGender::Female),
                ),
                languages: HashMap::new(),
            },
        );
        capabilities.insert(
            Capability::Transcribe,
            CapabilityEntries {
                default: Some(
                    ProviderConfig::new(ProviderKind::Google)
                        .with_encoding(AudioEncoding::WebmOpus, Some(48_000)),
                ),
                languages: HashMap::new(),
            },
        );
        Self { capabilities }
    }

    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let raw: HashMap<Capability, CapabilityEntries> = serde_json::from_str(json)?;

        let mut builder = Self::builder();
        for (capability, entries) in raw {
            if let Some(default) = entries.default {
                builder = builder.default_for(capability, default);
            }
            for (code, config) in entries.languages {
                builder = match config {
                    Some(config) => builder.language(capability, code, config),
                    None => builder.unsupported(capability, code),
                };
            }
        }
        builder.build()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Distinct providers referenced for a capability
    pub fn providers_for(&self, capability: Capability) -> Vec<ProviderKind> {
        let mut providers: Vec<ProviderKind> = Vec::new();
        if let Some(entries) = self.capabilities.get(&capability) {
            let configs = entries
                .default
                .iter()
                .chain(entries.languages.values().flatten());
            for config in configs {
                if !providers.contains(&config.provider) {
                    providers.push(config.provider);
                }
            }
        }
        providers
    }

    fn entries(&self, capability: Capability) -> Option<&CapabilityEntries> {
        self.capabilities.get(&capability)
    }
}

#[derive(Debug, Default)]
pub struct LanguageSupportTableBuilder {
    defaults: Vec<(Capability, ProviderConfig)>,
    languages: Vec<(Capability, String, Option<ProviderConfig>)>,
}

impl LanguageSupportTableBuilder {
    pub fn default_for(mut self, capability: Capability, config: ProviderConfig) -> Self {
        self.defaults.push((capability, config));
        self
    }

    pub fn language(
        mut self,
        capability: Capability,
        code: impl Into<String>,
        config: ProviderConfig,
    ) -> Self {
        self.languages.push((capability, code.into(), Some(config)));
        self
    }

    pub fn unsupported(mut self, capability: Capability, code: impl Into<String>) -> Self {
        self.languages.push((capability, code.into(), None));
        self
    }

    pub fn build(self) -> Result<LanguageSupportTable, TableError> {
        let mut capabilities: HashMap<Capability, CapabilityEntries> = HashMap::new();

        for (capability, config) in self.defaults {
            ensure_provider_serves(capability, &config)?;
            capabilities.entry(capability).or_default().default = Some(config);
        }

        for (capability, code, config) in self.languages {
            if let Some(config) = &config {
                ensure_provider_serves(capability, config)?;
            }
            let code = LanguageCode::parse(&code)?;
            capabilities
                .entry(capability)
                .or_default()
                .languages
                .insert(code.as_str().to_string(), config);
        }

        Ok(LanguageSupportTable { capabilities })
    }
}

fn ensure_provider_serves(capability: Capability, config: &ProviderConfig) -> Result<(), TableError> {
    if capability.providers().contains(&config.provider) {
        Ok(())
    } else {
        Err(TableError::UnsupportedProvider {
            capability,
            provider: config.provider,
        })
    }
}

/// Outcome of a policy lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    Supported(&'a ProviderConfig),
    Unsupported,
}

/// Picks the provider configuration for a capability and language.
///
/// Lookup order is exact code, then progressively less specific codes
/// (`hy-AM` before `hy`), then the capability default. An explicit
/// unsupported entry stops the lookup even when a default exists.
#[derive(Debug, Clone)]
pub struct LanguagePolicy {
    table: Arc<LanguageSupportTable>,
}

impl LanguagePolicy {
    pub fn new(table: Arc<LanguageSupportTable>) -> Self {
        Self { table }
    }

    pub fn resolve(&self, capability: Capability, language: &LanguageCode) -> Resolution<'_> {
        let Some(entries) = self.table.entries(capability) else {
            return Resolution::Unsupported;
        };

        for candidate in language.candidates() {
            if let Some(entry) = entries.languages.get(&candidate) {
                return match entry {
                    Some(config) => Resolution::Supported(config),
                    None => Resolution::Unsupported,
                };
            }
        }

        match &entries.default {
            Some(config) => Resolution::Supported(config),
            None => Resolution::Unsupported,
        }
    }
}
